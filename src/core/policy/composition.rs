//! Access policy composition
//!
//! The single entry point every entity list and mutation path goes through.

use super::types::{Decision, DenyReason, ListQueryResult, MutationAction};
use crate::config::{AccessConfig, EntityRegistry, PolicyConfig};
use crate::core::filter::{FilterEvaluator, ListAuthorization};
use crate::core::hierarchy::{HierarchyResolver, RequestScope, SharedHierarchyCache};
use crate::core::models::{EntityType, OwnershipFilter, RecordId, User};
use crate::core::ownership::OwnerIndex;
use crate::core::traits::{DirectoryStore, OwnershipStore, QueryExecutor};
use crate::utils::error::{AccessError, Result};
use crate::utils::logging::AuditLogger;
use std::sync::Arc;
use tracing::{debug, warn};

/// Ownership-scoped access policy
#[derive(Clone)]
pub struct AccessPolicy {
    policy: Arc<PolicyConfig>,
    registry: Arc<EntityRegistry>,
    hierarchy: HierarchyResolver,
    owners: OwnerIndex,
    evaluator: FilterEvaluator,
}

impl AccessPolicy {
    /// Wire the policy to its collaborators
    ///
    /// A shared hierarchy cache is created when the configuration enables one; callers
    /// must then forward org-structure changes to [`AccessPolicy::hierarchy_cache`].
    pub fn new(
        config: &AccessConfig,
        directory: Arc<dyn DirectoryStore>,
        ownership: Arc<dyn OwnershipStore>,
    ) -> Self {
        let policy = Arc::new(config.policy.clone());
        let registry = Arc::new(config.registry());

        let mut hierarchy = HierarchyResolver::new(directory.clone(), policy.clone());
        if let Some(cache) = SharedHierarchyCache::from_config(&config.hierarchy) {
            hierarchy = hierarchy.with_shared_cache(cache);
        }
        let owners = OwnerIndex::new(ownership);
        let evaluator = FilterEvaluator::new(
            policy.clone(),
            registry.clone(),
            directory,
            hierarchy.clone(),
            owners.clone(),
        );

        Self {
            policy,
            registry,
            hierarchy,
            owners,
            evaluator,
        }
    }

    /// Registered entity types
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Hierarchy resolver
    pub fn hierarchy(&self) -> &HierarchyResolver {
        &self.hierarchy
    }

    /// Object-owner index
    pub fn owners(&self) -> &OwnerIndex {
        &self.owners
    }

    /// Cross-request org-chart cache, when enabled
    pub fn hierarchy_cache(&self) -> Option<&SharedHierarchyCache> {
        self.hierarchy.shared_cache()
    }

    /// Parse a wire mode, falling back to the configured default when absent
    pub fn parse_mode(&self, raw: Option<&str>) -> Result<OwnershipFilter> {
        match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
            None => Ok(self.policy.default_mode),
            Some(raw) => raw.parse().map_err(AccessError::validation),
        }
    }

    /// Authorize a list query in a fresh request scope
    pub async fn authorize_list_query(
        &self,
        user: &User,
        mode: OwnershipFilter,
        entity_type: &EntityType,
    ) -> Result<ListAuthorization> {
        let scope = RequestScope::new();
        self.authorize_list_query_in(&scope, user, mode, entity_type)
            .await
    }

    /// Authorize a list query inside an existing request scope
    pub async fn authorize_list_query_in(
        &self,
        scope: &RequestScope,
        user: &User,
        mode: OwnershipFilter,
        entity_type: &EntityType,
    ) -> Result<ListAuthorization> {
        let authorization = self
            .evaluator
            .build_filter_predicate(scope, user, mode, entity_type)
            .await?;
        AuditLogger::log_list_authorization(user, entity_type, &authorization);
        Ok(authorization)
    }

    /// Authorize once, then run the query with the resulting filter
    pub async fn run_list_query(
        &self,
        user: &User,
        mode: OwnershipFilter,
        entity_type: &EntityType,
        executor: &dyn QueryExecutor,
    ) -> Result<ListQueryResult> {
        let authorization = self.authorize_list_query(user, mode, entity_type).await?;

        let records = if authorization.filter.is_nothing() {
            Vec::new()
        } else {
            executor.execute(&authorization.filter).await?
        };
        debug!(
            user_id = %user.id,
            entity_type = %entity_type,
            records = records.len(),
            "List query executed"
        );

        Ok(ListQueryResult {
            authorization,
            records,
        })
    }

    /// Decide whether a user may perform a write on a record
    ///
    /// Evaluated against current data on every call. Collaborator failures deny.
    pub async fn authorize_mutation(
        &self,
        user: &User,
        entity_type: &EntityType,
        record_id: RecordId,
        action: MutationAction,
    ) -> Result<Decision> {
        self.registry.resolve(entity_type)?;

        if user.is_deleted() {
            return Err(AccessError::not_found(format!("User {} is deleted", user.id)));
        }

        let decision = match self.decide_mutation(user, entity_type, record_id).await {
            Ok(decision) => decision,
            Err(e) if e.is_upstream_failure() => {
                warn!(
                    user_id = %user.id,
                    entity_type = %entity_type,
                    record_id = %record_id,
                    error = %e,
                    "Upstream data unavailable, denying mutation"
                );
                Decision::Deny(DenyReason::UpstreamUnavailable)
            }
            Err(e) => return Err(e),
        };

        AuditLogger::log_mutation_decision(user, entity_type, record_id, action, decision);
        Ok(decision)
    }

    async fn decide_mutation(
        &self,
        user: &User,
        entity_type: &EntityType,
        record_id: RecordId,
    ) -> Result<Decision> {
        if self.policy.is_read_only(user.role) {
            return Ok(Decision::Deny(DenyReason::InsufficientRole));
        }

        let record = self
            .owners
            .store()
            .find_record(entity_type, record_id)
            .await?
            .filter(|record| {
                !record.is_deleted() && record.organization_id == user.organization_id
            });
        let Some(record) = record else {
            return Ok(Decision::Deny(DenyReason::RecordNotFound));
        };

        if self.policy.is_admin(user.role) {
            return Ok(Decision::Allow);
        }

        if record.owner_id == Some(user.id) {
            return Ok(Decision::Allow);
        }

        let scope = RequestScope::new();
        if let Some(owner_id) = record.owner_id {
            let managed = self.hierarchy.managed_user_ids(&scope, user).await?;
            if managed.contains(&owner_id) {
                return Ok(Decision::Allow);
            }
        }

        if self.hierarchy.is_manager(&scope, user).await? {
            Ok(Decision::Deny(DenyReason::NotManagerOfOwner))
        } else {
            Ok(Decision::Deny(DenyReason::NotOwner))
        }
    }
}

impl std::fmt::Debug for AccessPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessPolicy")
            .field("policy", &self.policy)
            .field("entities", &self.registry.names())
            .field("hierarchy", &self.hierarchy)
            .finish_non_exhaustive()
    }
}
