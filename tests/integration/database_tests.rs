//! Database integration tests
//!
//! Drives the access policy against the SeaORM backend on in-memory SQLite.

#[cfg(test)]
mod tests {
    use crate::common::{ListResultAssertions, OrgFixture, RecordFactory, TestDatabase};
    use chrono::{Duration, Utc};
    use intime_access::config::AccessConfig;
    use intime_access::core::models::*;
    use intime_access::core::ownership::OwnerIndex;
    use intime_access::core::traits::{DirectoryStore, OwnershipStore};
    use intime_access::storage::memory::SnapshotAssignment;
    use intime_access::{AccessError, AccessPolicy, Decision, DenyReason, MutationAction};

    struct Jobs {
        manager: EntityRecord,
        report: EntityRecord,
        grand_report: EntityRecord,
        peer: EntityRecord,
        ic: EntityRecord,
        deleted: EntityRecord,
        foreign: EntityRecord,
    }

    struct Seeded {
        db: TestDatabase,
        org: OrgFixture,
        jobs: Jobs,
        policy: AccessPolicy,
    }

    /// Fixture org with one job per user, a deleted job, a foreign job, and the IC
    /// consulted on the report's job
    async fn seeded() -> Seeded {
        let org = OrgFixture::new();
        let outsider = User::new(OrganizationId::new(), UserRole::Admin);

        let jobs = Jobs {
            manager: RecordFactory::job(&org.manager),
            report: RecordFactory::job(&org.report),
            grand_report: RecordFactory::job(&org.grand_report),
            peer: RecordFactory::job(&org.peer_manager),
            ic: RecordFactory::job(&org.ic),
            deleted: RecordFactory::job(&org.report),
            foreign: RecordFactory::job(&outsider),
        };

        let mut snapshot = org.snapshot();
        snapshot.users.push(outsider);
        snapshot.records = vec![
            jobs.manager.clone(),
            jobs.report.clone(),
            jobs.grand_report.clone(),
            jobs.peer.clone(),
            jobs.ic.clone(),
            jobs.deleted.clone(),
            jobs.foreign.clone(),
        ];
        snapshot.assignments = vec![SnapshotAssignment {
            user_id: org.ic.id,
            entity_type: RecordFactory::job_type(),
            record_id: jobs.report.id,
            kind: OwnershipKind::Consulted,
            assigned_at: None,
        }];

        let db = TestDatabase::seeded(&snapshot).await;
        db.db()
            .soft_delete_record(&RecordFactory::job_type(), jobs.deleted.id, Utc::now())
            .await
            .unwrap();

        let policy = AccessPolicy::new(&AccessConfig::default(), db.db_arc(), db.db_arc());
        Seeded {
            db,
            org,
            jobs,
            policy,
        }
    }

    impl Seeded {
        async fn list(&self, user: &User, mode: OwnershipFilter) -> intime_access::ListQueryResult {
            self.policy
                .run_list_query(user, mode, &RecordFactory::job_type(), self.db.db())
                .await
                .unwrap()
        }

        async fn decide(&self, user: &User, record: &EntityRecord) -> Decision {
            self.policy
                .authorize_mutation(
                    user,
                    &RecordFactory::job_type(),
                    record.id,
                    MutationAction::Update,
                )
                .await
                .unwrap()
        }
    }

    /// Test basic database connection and health check
    #[tokio::test]
    async fn test_database_health_check() {
        let db = TestDatabase::new().await;
        let health = db.db().health_check().await;
        assert!(health.is_ok(), "Health check failed: {:?}", health.err());

        let stats = db.db().stats().await.unwrap();
        assert_eq!(stats.users, 0);
        assert_eq!(stats.assignments, 0);
        assert_eq!(stats.overrides, 0);
    }

    /// Migrations are idempotent
    #[tokio::test]
    async fn test_database_migration_reruns() {
        let db = TestDatabase::new().await;
        let result = db.db().migrate().await;
        assert!(result.is_ok(), "Migration failed: {:?}", result.err());
    }

    #[tokio::test]
    async fn test_directory_round_trip() {
        let s = seeded().await;

        let report = s.db.db().find_user(s.org.report.id).await.unwrap().unwrap();
        assert_eq!(report.role, UserRole::Member);
        assert_eq!(report.manager_id, Some(s.org.manager.id));
        assert_eq!(report.organization_id, s.org.org);

        let edges = s.db.db().reporting_edges(s.org.org).await.unwrap();
        assert_eq!(edges.len(), 7);

        s.db.db().soft_delete_user(s.org.ic.id, Utc::now()).await.unwrap();
        let edges = s.db.db().reporting_edges(s.org.org).await.unwrap();
        assert_eq!(edges.len(), 6);
        assert!(edges.iter().all(|edge| edge.user_id != s.org.ic.id));

        // Deleted users are still found, marked deleted
        let ic = s.db.db().find_user(s.org.ic.id).await.unwrap().unwrap();
        assert!(ic.is_deleted());
    }

    #[tokio::test]
    async fn test_set_manager_requires_live_member_of_same_org() {
        let s = seeded().await;
        let outsider = User::new(OrganizationId::new(), UserRole::Manager);
        s.db.db().upsert_user(&outsider).await.unwrap();

        let err = s
            .db
            .db()
            .set_manager(s.org.report.id, Some(outsider.id))
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::Validation(_)));

        s.db.db()
            .set_manager(s.org.report.id, Some(s.org.peer_manager.id))
            .await
            .unwrap();
        let report = s.db.db().find_user(s.org.report.id).await.unwrap().unwrap();
        assert_eq!(report.manager_id, Some(s.org.peer_manager.id));
    }

    #[tokio::test]
    async fn test_has_assignment_by_kind() {
        let s = seeded().await;
        let job = RecordFactory::job_type();
        let db = s.db.db();
        let (ic, report) = (s.org.ic.id, s.org.report.id);
        let responsible = [OwnershipKind::Responsible];
        let informed = [OwnershipKind::Informed];

        let consulted_on_report = db
            .has_assignment(ic, &job, s.jobs.report.id, &CONSULTED_VISIBILITY)
            .await
            .unwrap();
        assert!(consulted_on_report);

        let informed_on_report = db
            .has_assignment(ic, &job, s.jobs.report.id, &informed)
            .await
            .unwrap();
        assert!(!informed_on_report);

        let owns_report = db
            .has_assignment(report, &job, s.jobs.report.id, &responsible)
            .await
            .unwrap();
        assert!(owns_report);

        let consulted_on_manager = db
            .has_assignment(ic, &job, s.jobs.manager.id, &CONSULTED_VISIBILITY)
            .await
            .unwrap();
        assert!(!consulted_on_manager);

        let no_kinds = db
            .has_assignment(ic, &job, s.jobs.report.id, &[])
            .await
            .unwrap();
        assert!(!no_kinds);
    }

    #[tokio::test]
    async fn test_ownership_kinds_ordered_by_assignment_time() {
        let s = seeded().await;
        let job = RecordFactory::job_type();
        let now = Utc::now();

        let mut informed = OwnershipAssignment::new(
            s.org.viewer.id,
            job.clone(),
            s.jobs.manager.id,
            OwnershipKind::Informed,
        );
        informed.assigned_at = now - Duration::hours(2);
        let mut consulted = OwnershipAssignment::new(
            s.org.admin.id,
            job.clone(),
            s.jobs.manager.id,
            OwnershipKind::Consulted,
        );
        consulted.assigned_at = now - Duration::hours(1);

        // Inserted newest first so row order cannot stand in for time order
        s.db.db().assign(&consulted).await.unwrap();
        s.db.db().assign(&informed).await.unwrap();

        let index = OwnerIndex::new(s.db.db_arc());
        let kinds = index
            .get_ownership_kinds(&job, s.jobs.manager.id)
            .await
            .unwrap();
        assert_eq!(
            kinds,
            vec![
                (s.org.viewer.id, OwnershipKind::Informed),
                (s.org.admin.id, OwnershipKind::Consulted),
                (s.org.manager.id, OwnershipKind::Responsible),
            ]
        );

        let unassigned = RecordFactory::job(&s.org.ic);
        s.db.db().insert_record(&unassigned).await.unwrap();
        s.db.db()
            .unassign(s.org.ic.id, &job, unassigned.id, OwnershipKind::Responsible)
            .await
            .unwrap();
        assert!(
            index
                .get_ownership_kinds(&job, unassigned.id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_set_manager_rejects_cycle() {
        let s = seeded().await;

        let err = s
            .db
            .db()
            .set_manager(s.org.manager.id, Some(s.org.grand_report.id))
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::Validation(_)));

        let err = s
            .db
            .db()
            .set_manager(s.org.report.id, Some(s.org.report.id))
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::Validation(_)));

        let manager = s.db.db().find_user(s.org.manager.id).await.unwrap().unwrap();
        assert_eq!(manager.manager_id, None);
    }

    #[tokio::test]
    async fn test_my_items_and_my_team() {
        let s = seeded().await;

        let mine = s.list(&s.org.manager, OwnershipFilter::MyItems).await;
        mine.assert_records(&[s.jobs.manager.id]);

        let team = s.list(&s.org.manager, OwnershipFilter::MyTeam).await;
        team.assert_not_downgraded();
        team.assert_records(&[s.jobs.manager.id, s.jobs.report.id, s.jobs.grand_report.id]);
    }

    #[tokio::test]
    async fn test_ic_team_request_is_narrowed() {
        let s = seeded().await;

        let result = s.list(&s.org.ic, OwnershipFilter::MyTeam).await;
        result.assert_downgraded_to(OwnershipFilter::MyItems);
        result.assert_records(&[s.jobs.ic.id]);
    }

    #[tokio::test]
    async fn test_consulted_and_all_accessible() {
        let s = seeded().await;

        let consulted = s.list(&s.org.ic, OwnershipFilter::Consulted).await;
        consulted.assert_records(&[s.jobs.report.id]);

        let accessible = s.list(&s.org.ic, OwnershipFilter::AllAccessible).await;
        accessible.assert_records(&[s.jobs.ic.id, s.jobs.report.id]);

        let org_wide = s.list(&s.org.ic, OwnershipFilter::AllOrg).await;
        org_wide.assert_downgraded_to(OwnershipFilter::AllAccessible);
        org_wide.assert_records(&[s.jobs.ic.id, s.jobs.report.id]);

        // Nobody consults the peer manager
        let empty = s.list(&s.org.peer_manager, OwnershipFilter::Consulted).await;
        assert!(empty.records.is_empty());
        assert!(empty.authorization.filter.is_nothing());
    }

    #[tokio::test]
    async fn test_admin_all_org_is_tenant_pinned() {
        let s = seeded().await;

        let result = s.list(&s.org.admin, OwnershipFilter::AllOrg).await;
        result.assert_not_downgraded();
        // Neither the deleted job nor the other organization's job
        result.assert_records(&[
            s.jobs.manager.id,
            s.jobs.report.id,
            s.jobs.grand_report.id,
            s.jobs.peer.id,
            s.jobs.ic.id,
        ]);
    }

    #[tokio::test]
    async fn test_mutation_decisions() {
        let s = seeded().await;

        assert_eq!(s.decide(&s.org.report, &s.jobs.report).await, Decision::Allow);
        assert_eq!(
            s.decide(&s.org.manager, &s.jobs.grand_report).await,
            Decision::Allow
        );
        assert_eq!(
            s.decide(&s.org.peer_manager, &s.jobs.report).await,
            Decision::Deny(DenyReason::NotManagerOfOwner)
        );
        // Consulted is not ownership
        assert_eq!(
            s.decide(&s.org.ic, &s.jobs.report).await,
            Decision::Deny(DenyReason::NotOwner)
        );
        assert_eq!(
            s.decide(&s.org.admin, &s.jobs.deleted).await,
            Decision::Deny(DenyReason::RecordNotFound)
        );
        assert_eq!(
            s.decide(&s.org.admin, &s.jobs.foreign).await,
            Decision::Deny(DenyReason::RecordNotFound)
        );
        assert_eq!(
            s.decide(&s.org.viewer, &s.jobs.ic).await,
            Decision::Deny(DenyReason::InsufficientRole)
        );
    }

    #[tokio::test]
    async fn test_assignment_lifecycle() {
        let s = seeded().await;
        let db = s.db.db();
        let job = RecordFactory::job_type();
        let record = s.jobs.ic.id;

        let informed =
            OwnershipAssignment::new(s.org.viewer.id, job.clone(), record, OwnershipKind::Informed);
        db.assign(&informed).await.unwrap();
        // Idempotent
        db.assign(&informed).await.unwrap();
        assert_eq!(db.assignments_for(&job, record).await.unwrap().len(), 2);

        let second_primary =
            OwnershipAssignment::new(s.org.admin.id, job.clone(), record, OwnershipKind::Responsible);
        assert!(matches!(
            db.assign(&second_primary).await,
            Err(AccessError::Conflict(_))
        ));

        db.reassign_primary(&job, record, s.org.report.id).await.unwrap();
        let found = db.find_record(&job, record).await.unwrap().unwrap();
        assert_eq!(found.owner_id, Some(s.org.report.id));
        let primaries: Vec<_> = db
            .assignments_for(&job, record)
            .await
            .unwrap()
            .into_iter()
            .filter(|row| row.kind.is_primary())
            .collect();
        assert_eq!(primaries.len(), 1);
        assert_eq!(primaries[0].user_id, s.org.report.id);

        // The next decision sees the new owner
        assert_eq!(
            s.decide(&s.org.ic, &found).await,
            Decision::Deny(DenyReason::NotOwner)
        );
        assert_eq!(s.decide(&s.org.manager, &found).await, Decision::Allow);

        assert!(
            db.unassign(s.org.report.id, &job, record, OwnershipKind::Responsible)
                .await
                .unwrap()
        );
        let found = db.find_record(&job, record).await.unwrap().unwrap();
        assert_eq!(found.owner_id, None);

        assert!(db.purge_record(&job, record).await.unwrap());
        assert!(!db.purge_record(&job, record).await.unwrap());
        assert!(db.assignments_for(&job, record).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_assign_on_missing_record_not_found() {
        let s = seeded().await;
        let assignment = OwnershipAssignment::new(
            s.org.ic.id,
            RecordFactory::job_type(),
            RecordId::new(),
            OwnershipKind::Consulted,
        );
        assert!(matches!(
            s.db.db().assign(&assignment).await,
            Err(AccessError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_override_lifecycle() {
        let s = seeded().await;
        let db = s.db.db();
        let mut grant = PermissionOverride {
            id: OverrideId::new(),
            organization_id: s.org.org,
            user_id: s.org.ic.id,
            entity_type: Some(RecordFactory::job_type()),
            scope: OverrideScope::Org,
            granted: true,
            reason: "too short".to_string(),
            expires_at: None,
            revoked_at: None,
        };
        assert!(matches!(
            db.insert_override(&grant).await,
            Err(AccessError::Validation(_))
        ));

        grant.reason = "Covering the payroll desk this week".to_string();
        db.insert_override(&grant).await.unwrap();

        let result = s.list(&s.org.ic, OwnershipFilter::AllOrg).await;
        result.assert_not_downgraded();
        assert_eq!(result.records.len(), 5);

        db.revoke_override(grant.id, Utc::now()).await.unwrap();
        let result = s.list(&s.org.ic, OwnershipFilter::AllOrg).await;
        result.assert_downgraded_to(OwnershipFilter::AllAccessible);
    }

    #[tokio::test]
    async fn test_expired_override_is_inactive() {
        let s = seeded().await;
        let now = Utc::now();
        let expired = PermissionOverride {
            id: OverrideId::new(),
            organization_id: s.org.org,
            user_id: s.org.ic.id,
            entity_type: None,
            scope: OverrideScope::Team,
            granted: true,
            reason: "Temporary team lead cover".to_string(),
            expires_at: Some(now - Duration::hours(1)),
            revoked_at: None,
        };
        s.db.db().insert_override(&expired).await.unwrap();

        let active = s
            .db
            .db()
            .active_overrides(s.org.org, s.org.ic.id, now)
            .await
            .unwrap();
        assert!(active.is_empty());

        let active = s
            .db
            .db()
            .active_overrides(s.org.org, s.org.ic.id, now - Duration::hours(2))
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
    }

    #[tokio::test]
    async fn test_unregistered_entity_is_configuration_error() {
        let s = seeded().await;
        let err = s
            .db
            .db()
            .find_record(&EntityType::from("spaceship"), RecordId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::Configuration(_)));
    }
}
