//! In-memory query executor

use super::ownership::InMemoryOwnershipStore;
use crate::core::filter::EffectiveFilter;
use crate::core::models::EntityRecord;
use crate::core::traits::QueryExecutor;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Applies effective filters to the records of an [`InMemoryOwnershipStore`]
#[derive(Debug, Clone)]
pub struct InMemoryQueryExecutor {
    store: Arc<InMemoryOwnershipStore>,
}

impl InMemoryQueryExecutor {
    pub fn new(store: Arc<InMemoryOwnershipStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl QueryExecutor for InMemoryQueryExecutor {
    async fn execute(&self, filter: &EffectiveFilter) -> Result<Vec<EntityRecord>> {
        let entity_type = filter.entity_type();
        let assignments = self.store.assignments_of(entity_type);

        let mut records: Vec<EntityRecord> = self
            .store
            .records_of(entity_type)
            .into_iter()
            .filter(|record| filter.matches(record, &assignments))
            .collect();
        records.sort_by_key(|record| record.id);
        Ok(records)
    }
}
