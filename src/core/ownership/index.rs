//! Object-owner index

use crate::core::models::{EntityType, OwnershipKind, RecordId, UserId};
use crate::core::traits::OwnershipStore;
use crate::utils::error::Result;
use std::sync::Arc;

/// Read view over RCAI assignments
#[derive(Clone)]
pub struct OwnerIndex {
    store: Arc<dyn OwnershipStore>,
}

impl OwnerIndex {
    /// Create an index over a store
    pub fn new(store: Arc<dyn OwnershipStore>) -> Self {
        Self { store }
    }

    /// Every relationship on a record, ordered by assignment time then user id
    ///
    /// An unassigned record yields an empty list.
    pub async fn get_ownership_kinds(
        &self,
        entity_type: &EntityType,
        record_id: RecordId,
    ) -> Result<Vec<(UserId, OwnershipKind)>> {
        let mut assignments = self.store.assignments_for(entity_type, record_id).await?;
        assignments.sort_by(|a, b| {
            a.assigned_at
                .cmp(&b.assigned_at)
                .then(a.user_id.cmp(&b.user_id))
                .then(a.kind.cmp(&b.kind))
        });
        Ok(assignments
            .into_iter()
            .map(|assignment| (assignment.user_id, assignment.kind))
            .collect())
    }

    /// Whether the user relates to the record with one of `kinds`
    pub async fn is_owner_or_consulted(
        &self,
        user_id: UserId,
        entity_type: &EntityType,
        record_id: RecordId,
        kinds: &[OwnershipKind],
    ) -> Result<bool> {
        if kinds.is_empty() {
            return Ok(false);
        }
        self.store
            .has_assignment(user_id, entity_type, record_id, kinds)
            .await
    }

    /// Whether the user relates to any record of the type with one of `kinds`
    pub async fn has_visibility_assignments(
        &self,
        user_id: UserId,
        entity_type: &EntityType,
        kinds: &[OwnershipKind],
    ) -> Result<bool> {
        if kinds.is_empty() {
            return Ok(false);
        }
        self.store
            .has_any_assignment(user_id, entity_type, kinds)
            .await
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<dyn OwnershipStore> {
        &self.store
    }
}

impl std::fmt::Debug for OwnerIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnerIndex").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{CONSULTED_VISIBILITY, OwnershipAssignment};
    use crate::core::traits::MockOwnershipStore;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_ownership_kinds_are_ordered() {
        let job = EntityType::from("job");
        let record_id = RecordId::new();
        let (owner, reviewer) = (UserId::new(), UserId::new());
        let now = Utc::now();

        let mut late = OwnershipAssignment::new(reviewer, job.clone(), record_id, OwnershipKind::Informed);
        late.assigned_at = now;
        let mut early = OwnershipAssignment::new(owner, job.clone(), record_id, OwnershipKind::Responsible);
        early.assigned_at = now - Duration::minutes(5);
        let rows = vec![late, early];

        let mut store = MockOwnershipStore::new();
        store
            .expect_assignments_for()
            .returning(move |_, _| Ok(rows.clone()));
        let index = OwnerIndex::new(Arc::new(store));

        let kinds = index.get_ownership_kinds(&job, record_id).await.unwrap();
        assert_eq!(
            kinds,
            vec![
                (owner, OwnershipKind::Responsible),
                (reviewer, OwnershipKind::Informed)
            ]
        );
    }

    #[tokio::test]
    async fn test_unassigned_record_is_empty() {
        let mut store = MockOwnershipStore::new();
        store.expect_assignments_for().returning(|_, _| Ok(vec![]));
        let index = OwnerIndex::new(Arc::new(store));

        let kinds = index
            .get_ownership_kinds(&EntityType::from("deal"), RecordId::new())
            .await
            .unwrap();
        assert!(kinds.is_empty());
    }

    #[tokio::test]
    async fn test_empty_kind_set_short_circuits() {
        // No expectations: any store call would panic
        let index = OwnerIndex::new(Arc::new(MockOwnershipStore::new()));
        let job = EntityType::from("job");

        assert!(!index
            .is_owner_or_consulted(UserId::new(), &job, RecordId::new(), &[])
            .await
            .unwrap());
        assert!(!index
            .has_visibility_assignments(UserId::new(), &job, &[])
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_membership_delegates_to_store() {
        let user = UserId::new();
        let mut store = MockOwnershipStore::new();
        store
            .expect_has_assignment()
            .withf(move |u, _, _, kinds| *u == user && kinds == CONSULTED_VISIBILITY.as_slice())
            .returning(|_, _, _, _| Ok(true));
        let index = OwnerIndex::new(Arc::new(store));

        assert!(index
            .is_owner_or_consulted(user, &EntityType::from("job"), RecordId::new(), &CONSULTED_VISIBILITY)
            .await
            .unwrap());
    }
}
