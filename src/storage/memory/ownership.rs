//! In-memory ownership store

use crate::core::models::{
    EntityRecord, EntityType, OwnershipAssignment, OwnershipKind, RecordId, UserId,
};
use crate::core::traits::OwnershipStore;
use crate::utils::error::{AccessError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

type RecordKey = (EntityType, RecordId);

/// Records and RCAI assignments held in memory
///
/// The record's owner column and its Responsible assignment are kept in step: assigning
/// or reassigning the primary owner updates both.
#[derive(Debug, Default)]
pub struct InMemoryOwnershipStore {
    records: DashMap<RecordKey, EntityRecord>,
    assignments: DashMap<RecordKey, Vec<OwnershipAssignment>>,
}

impl InMemoryOwnershipStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, creating the Responsible assignment for its owner
    pub fn insert_record(&self, record: EntityRecord) -> Result<()> {
        let key = (record.entity_type.clone(), record.id);
        if self.records.contains_key(&key) {
            return Err(AccessError::conflict(format!(
                "Record {} of type {} already exists",
                record.id, record.entity_type
            )));
        }

        let mut rows = Vec::new();
        if let Some(owner_id) = record.owner_id {
            rows.push(OwnershipAssignment::new(
                owner_id,
                record.entity_type.clone(),
                record.id,
                OwnershipKind::Responsible,
            ));
        }
        self.assignments.insert(key.clone(), rows);
        self.records.insert(key, record);
        Ok(())
    }

    /// Add an assignment
    ///
    /// Re-adding an existing (user, kind) pair is a no-op. A second Responsible assignment
    /// is a conflict; use [`InMemoryOwnershipStore::reassign_primary`] instead.
    pub fn assign(&self, assignment: OwnershipAssignment) -> Result<()> {
        let key = (assignment.entity_type.clone(), assignment.record_id);
        let mut record = self.records.get_mut(&key).ok_or_else(|| {
            AccessError::not_found(format!(
                "Record {} of type {} not found",
                assignment.record_id, assignment.entity_type
            ))
        })?;
        let mut rows = self.assignments.entry(key).or_default();

        if rows
            .iter()
            .any(|row| row.user_id == assignment.user_id && row.kind == assignment.kind)
        {
            return Ok(());
        }

        if assignment.kind.is_primary() {
            if rows.iter().any(|row| row.kind.is_primary()) {
                return Err(AccessError::conflict(format!(
                    "Record {} already has a responsible owner",
                    assignment.record_id
                )));
            }
            record.owner_id = Some(assignment.user_id);
        }

        debug!(
            user_id = %assignment.user_id,
            record_id = %assignment.record_id,
            kind = %assignment.kind,
            "Ownership assigned"
        );
        rows.push(assignment);
        Ok(())
    }

    /// Remove an assignment; returns whether one existed
    pub fn unassign(
        &self,
        user_id: UserId,
        entity_type: &EntityType,
        record_id: RecordId,
        kind: OwnershipKind,
    ) -> bool {
        let key = (entity_type.clone(), record_id);
        let removed = self
            .assignments
            .get_mut(&key)
            .map(|mut rows| {
                let before = rows.len();
                rows.retain(|row| !(row.user_id == user_id && row.kind == kind));
                rows.len() != before
            })
            .unwrap_or(false);

        if removed && kind.is_primary() {
            if let Some(mut record) = self.records.get_mut(&key) {
                if record.owner_id == Some(user_id) {
                    record.owner_id = None;
                }
            }
        }
        removed
    }

    /// Move the primary owner of a record to `new_owner`
    pub fn reassign_primary(
        &self,
        entity_type: &EntityType,
        record_id: RecordId,
        new_owner: UserId,
    ) -> Result<()> {
        let key = (entity_type.clone(), record_id);
        let mut record = self.records.get_mut(&key).ok_or_else(|| {
            AccessError::not_found(format!(
                "Record {} of type {} not found",
                record_id, entity_type
            ))
        })?;
        let mut rows = self.assignments.entry(key).or_default();

        rows.retain(|row| !row.kind.is_primary());
        rows.push(OwnershipAssignment::new(
            new_owner,
            entity_type.clone(),
            record_id,
            OwnershipKind::Responsible,
        ));
        record.owner_id = Some(new_owner);
        debug!(record_id = %record_id, owner_id = %new_owner, "Primary owner reassigned");
        Ok(())
    }

    /// Mark a record deleted; it disappears from every listing
    pub fn soft_delete_record(
        &self,
        entity_type: &EntityType,
        record_id: RecordId,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let mut record = self
            .records
            .get_mut(&(entity_type.clone(), record_id))
            .ok_or_else(|| AccessError::not_found(format!("Record {} not found", record_id)))?;
        record.deleted_at = Some(at);
        Ok(())
    }

    /// Delete a record and every assignment on it; returns whether it existed
    pub fn purge_record(&self, entity_type: &EntityType, record_id: RecordId) -> bool {
        let key = (entity_type.clone(), record_id);
        self.assignments.remove(&key);
        self.records.remove(&key).is_some()
    }

    /// Records of one entity type, deleted ones included
    pub fn records_of(&self, entity_type: &EntityType) -> Vec<EntityRecord> {
        self.records
            .iter()
            .filter(|entry| entry.key().0 == *entity_type)
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Assignments on one entity type held by any user
    pub fn assignments_of(&self, entity_type: &EntityType) -> Vec<OwnershipAssignment> {
        self.assignments
            .iter()
            .filter(|entry| entry.key().0 == *entity_type)
            .flat_map(|entry| entry.value().clone())
            .collect()
    }
}

#[async_trait]
impl OwnershipStore for InMemoryOwnershipStore {
    async fn assignments_for(
        &self,
        entity_type: &EntityType,
        record_id: RecordId,
    ) -> Result<Vec<OwnershipAssignment>> {
        Ok(self
            .assignments
            .get(&(entity_type.clone(), record_id))
            .map(|rows| rows.clone())
            .unwrap_or_default())
    }

    async fn has_assignment(
        &self,
        user_id: UserId,
        entity_type: &EntityType,
        record_id: RecordId,
        kinds: &[OwnershipKind],
    ) -> Result<bool> {
        Ok(self
            .assignments
            .get(&(entity_type.clone(), record_id))
            .is_some_and(|rows| {
                rows.iter()
                    .any(|row| row.user_id == user_id && kinds.contains(&row.kind))
            }))
    }

    async fn has_any_assignment(
        &self,
        user_id: UserId,
        entity_type: &EntityType,
        kinds: &[OwnershipKind],
    ) -> Result<bool> {
        Ok(self.assignments.iter().any(|entry| {
            entry.key().0 == *entity_type
                && entry
                    .value()
                    .iter()
                    .any(|row| row.user_id == user_id && kinds.contains(&row.kind))
        }))
    }

    async fn find_record(
        &self,
        entity_type: &EntityType,
        record_id: RecordId,
    ) -> Result<Option<EntityRecord>> {
        Ok(self
            .records
            .get(&(entity_type.clone(), record_id))
            .map(|record| record.clone()))
    }
}
