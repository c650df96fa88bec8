//! Ownership filter evaluation
//!
//! The evaluator resolves a requested [`OwnershipFilter`](crate::core::models::OwnershipFilter)
//! into an [`EffectiveFilter`]: a declarative value that query executors translate
//! into their own predicate language.

mod evaluator;
mod matcher;
mod types;

pub use evaluator::FilterEvaluator;
pub use types::{
    Downgrade, DowngradeReason, EffectiveFilter, FilterScope, ListAuthorization, TenantGuard,
    UpstreamFailure,
};
