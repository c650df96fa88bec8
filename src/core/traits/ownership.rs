//! Ownership store trait definition

use crate::core::models::{
    EntityRecord, EntityType, OwnershipAssignment, OwnershipKind, RecordId, UserId,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Source of RCAI assignments and record ownership rows
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnershipStore: Send + Sync {
    /// Every assignment on a record, in any order
    async fn assignments_for(
        &self,
        entity_type: &EntityType,
        record_id: RecordId,
    ) -> Result<Vec<OwnershipAssignment>>;

    /// Whether `user_id` holds an assignment of one of `kinds` on the record
    async fn has_assignment(
        &self,
        user_id: UserId,
        entity_type: &EntityType,
        record_id: RecordId,
        kinds: &[OwnershipKind],
    ) -> Result<bool>;

    /// Whether `user_id` holds an assignment of one of `kinds` on any record of the type
    async fn has_any_assignment(
        &self,
        user_id: UserId,
        entity_type: &EntityType,
        kinds: &[OwnershipKind],
    ) -> Result<bool>;

    /// Ownership projection of a record, including soft-deleted ones
    async fn find_record(
        &self,
        entity_type: &EntityType,
        record_id: RecordId,
    ) -> Result<Option<EntityRecord>>;
}
