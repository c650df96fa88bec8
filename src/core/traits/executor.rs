//! Query executor trait definition

use crate::core::filter::EffectiveFilter;
use crate::core::models::EntityRecord;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Runs an authorized list query
///
/// Implementations translate the declarative filter into their own predicate language;
/// the filter is the only row restriction they may apply.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Records matching `filter`
    async fn execute(&self, filter: &EffectiveFilter) -> Result<Vec<EntityRecord>>;
}
