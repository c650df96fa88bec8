//! End-to-end policy scenarios on the demo snapshot
//!
//! Runs the engine over in-memory stores loaded from `config/snapshot.example.yaml`.

#[cfg(test)]
mod tests {
    use crate::common::ListResultAssertions;
    use intime_access::config::AccessConfig;
    use intime_access::core::models::{EntityType, OwnershipFilter, RecordId, UserId};
    use intime_access::core::HierarchyEvent;
    use intime_access::storage::memory::{InMemoryBackend, Snapshot};
    use intime_access::{
        AccessEngine, Config, Decision, DenyReason, FilterScope, MutationAction, StorageLayer,
    };

    const SNAPSHOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config/snapshot.example.yaml");

    const MAYA: &str = "6f1c2a9e-0000-4000-8000-00000000a001";
    const RAVI: &str = "6f1c2a9e-0000-4000-8000-00000000a002";
    const ANA: &str = "6f1c2a9e-0000-4000-8000-00000000a003";
    const LEO: &str = "6f1c2a9e-0000-4000-8000-00000000a004";
    const IRIS: &str = "6f1c2a9e-0000-4000-8000-00000000a005";

    const RAVI_JOB: &str = "6f1c2a9e-0000-4000-8000-00000000b001";
    const ANA_JOB: &str = "6f1c2a9e-0000-4000-8000-00000000b002";
    const LEO_JOB: &str = "6f1c2a9e-0000-4000-8000-00000000b003";

    fn user(id: &str) -> UserId {
        id.parse().unwrap()
    }

    fn record(id: &str) -> RecordId {
        id.parse().unwrap()
    }

    fn job() -> EntityType {
        EntityType::from("job")
    }

    async fn backend() -> InMemoryBackend {
        Snapshot::from_file(SNAPSHOT).await.unwrap().load().unwrap()
    }

    fn engine_with(access: AccessConfig, backend: InMemoryBackend) -> AccessEngine {
        AccessEngine::with_storage(Config { access }, StorageLayer::in_memory(backend))
    }

    async fn engine() -> AccessEngine {
        engine_with(AccessConfig::default(), backend().await)
    }

    #[tokio::test]
    async fn test_manager_sees_transitive_team() {
        let engine = engine().await;

        let team = engine
            .list(user(MAYA), OwnershipFilter::MyTeam, &job())
            .await
            .unwrap();
        team.assert_not_downgraded();
        team.assert_records(&[record(RAVI_JOB), record(ANA_JOB)]);

        // Ravi has no manager role but manages Ana
        let team = engine
            .list(user(RAVI), OwnershipFilter::MyTeam, &job())
            .await
            .unwrap();
        team.assert_not_downgraded();
        team.assert_records(&[record(RAVI_JOB), record(ANA_JOB)]);

        let team = engine
            .list(user(ANA), OwnershipFilter::MyTeam, &job())
            .await
            .unwrap();
        team.assert_downgraded_to(OwnershipFilter::MyItems);
        team.assert_records(&[record(ANA_JOB)]);
    }

    #[tokio::test]
    async fn test_org_grant_override_widens_visibility() {
        let engine = engine().await;

        let all = engine
            .list(user(LEO), OwnershipFilter::AllOrg, &job())
            .await
            .unwrap();
        all.assert_not_downgraded();
        all.assert_records(&[record(RAVI_JOB), record(ANA_JOB), record(LEO_JOB)]);

        // The grant is scoped to jobs
        let other = engine
            .list(user(LEO), OwnershipFilter::AllOrg, &EntityType::from("deal"))
            .await
            .unwrap();
        other.assert_downgraded_to(OwnershipFilter::AllAccessible);

        let consulted = engine
            .list(user(LEO), OwnershipFilter::Consulted, &job())
            .await
            .unwrap();
        consulted.assert_records(&[record(ANA_JOB)]);
    }

    #[tokio::test]
    async fn test_mutation_decisions_on_snapshot() {
        let engine = engine().await;
        let check = |who: &str, what: &str| {
            let engine = engine.clone();
            let (who, what) = (user(who), record(what));
            async move {
                engine
                    .check_mutation(who, &job(), what, MutationAction::Update)
                    .await
                    .unwrap()
            }
        };

        assert_eq!(check(MAYA, ANA_JOB).await, Decision::Allow);
        assert_eq!(check(RAVI, ANA_JOB).await, Decision::Allow);
        assert_eq!(check(IRIS, LEO_JOB).await, Decision::Allow);
        assert_eq!(check(ANA, RAVI_JOB).await, Decision::Deny(DenyReason::NotOwner));
        // Consulted does not grant write access
        assert_eq!(check(LEO, ANA_JOB).await, Decision::Deny(DenyReason::NotOwner));
        assert_eq!(
            check(MAYA, LEO_JOB).await,
            Decision::Deny(DenyReason::NotManagerOfOwner)
        );
    }

    #[tokio::test]
    async fn test_reassignment_visible_without_shared_cache() {
        let backend = backend().await;
        let directory = backend.directory.clone();
        let engine = engine_with(AccessConfig::default(), backend);

        directory.set_manager(user(ANA), Some(user(LEO))).unwrap();

        let team = engine
            .list(user(MAYA), OwnershipFilter::MyTeam, &job())
            .await
            .unwrap();
        team.assert_records(&[record(RAVI_JOB)]);

        let team = engine
            .list(user(LEO), OwnershipFilter::MyTeam, &job())
            .await
            .unwrap();
        team.assert_not_downgraded();
        team.assert_records(&[record(LEO_JOB), record(ANA_JOB)]);
    }

    #[tokio::test]
    async fn test_shared_cache_needs_invalidation_event() {
        let backend = backend().await;
        let directory = backend.directory.clone();
        let mut access = AccessConfig::default();
        access.hierarchy.shared_cache = true;
        let engine = engine_with(access, backend);

        let team = engine
            .list(user(MAYA), OwnershipFilter::MyTeam, &job())
            .await
            .unwrap();
        team.assert_records(&[record(RAVI_JOB), record(ANA_JOB)]);

        directory.set_manager(user(ANA), Some(user(LEO))).unwrap();

        // Stale until the change is announced
        let team = engine
            .list(user(MAYA), OwnershipFilter::MyTeam, &job())
            .await
            .unwrap();
        team.assert_records(&[record(RAVI_JOB), record(ANA_JOB)]);

        let org = engine.user(user(ANA)).await.unwrap().organization_id;
        engine
            .policy()
            .hierarchy_cache()
            .unwrap()
            .handle_event(HierarchyEvent::ManagerReassigned {
                organization_id: org,
                user_id: user(ANA),
            })
            .await;

        let team = engine
            .list(user(MAYA), OwnershipFilter::MyTeam, &job())
            .await
            .unwrap();
        team.assert_records(&[record(RAVI_JOB)]);
    }

    #[tokio::test]
    async fn test_prune_consulted_clause() {
        let mut access = AccessConfig::default();
        access.policy.prune_consulted_clause = true;
        let engine = engine_with(access, backend().await);

        // Ravi is consulted on nothing, so only the ownership branch remains
        let ravi = engine
            .list(user(RAVI), OwnershipFilter::AllAccessible, &job())
            .await
            .unwrap();
        assert!(matches!(
            ravi.authorization.filter.scope(),
            FilterScope::OwnedBy { .. }
        ));
        ravi.assert_records(&[record(RAVI_JOB), record(ANA_JOB)]);

        let leo = engine
            .list(user(LEO), OwnershipFilter::AllAccessible, &job())
            .await
            .unwrap();
        assert!(matches!(
            leo.authorization.filter.scope(),
            FilterScope::Union { .. }
        ));
        leo.assert_records(&[record(LEO_JOB), record(ANA_JOB)]);
    }

    #[tokio::test]
    async fn test_unknown_user_and_entity() {
        let engine = engine().await;

        let err = engine
            .list(UserId::new(), OwnershipFilter::MyItems, &job())
            .await
            .unwrap_err();
        assert!(matches!(err, intime_access::AccessError::NotFound(_)));

        let err = engine
            .list(user(MAYA), OwnershipFilter::MyItems, &EntityType::from("spaceship"))
            .await
            .unwrap_err();
        assert!(matches!(err, intime_access::AccessError::Configuration(_)));
    }
}
