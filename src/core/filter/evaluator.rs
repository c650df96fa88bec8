//! Ownership filter evaluator

use super::types::{
    Downgrade, DowngradeReason, EffectiveFilter, FilterScope, ListAuthorization, UpstreamFailure,
};
use crate::config::{EntityRegistry, PolicyConfig};
use crate::core::hierarchy::{HierarchyResolver, RequestScope};
use crate::core::models::{
    CONSULTED_VISIBILITY, EntityType, OverrideScope, OwnershipFilter, User, UserId,
};
use crate::core::overrides::EffectiveOverrides;
use crate::core::ownership::OwnerIndex;
use crate::core::traits::DirectoryStore;
use crate::utils::error::{AccessError, Result};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Turns a user and a requested mode into an [`EffectiveFilter`]
#[derive(Clone)]
pub struct FilterEvaluator {
    policy: Arc<PolicyConfig>,
    registry: Arc<EntityRegistry>,
    directory: Arc<dyn DirectoryStore>,
    hierarchy: HierarchyResolver,
    owners: OwnerIndex,
}

/// Mode after privilege checks, with the facts later steps need
struct ModeResolution {
    effective: OwnershipFilter,
    downgrade: Option<Downgrade>,
    team_visible: bool,
}

impl ModeResolution {
    /// Most restrictive reading of `requested` when privileges are unknown
    fn unresolved(requested: OwnershipFilter) -> Self {
        let effective = match requested {
            OwnershipFilter::MyTeam | OwnershipFilter::AllOrg => OwnershipFilter::MyItems,
            mode => mode,
        };
        Self {
            effective,
            downgrade: (effective != requested).then_some(Downgrade {
                from: requested,
                to: effective,
                reason: DowngradeReason::PrivilegeUnavailable,
            }),
            team_visible: false,
        }
    }
}

impl FilterEvaluator {
    /// Create an evaluator
    pub fn new(
        policy: Arc<PolicyConfig>,
        registry: Arc<EntityRegistry>,
        directory: Arc<dyn DirectoryStore>,
        hierarchy: HierarchyResolver,
        owners: OwnerIndex,
    ) -> Self {
        Self {
            policy,
            registry,
            directory,
            hierarchy,
            owners,
        }
    }

    /// Resolve the filter for a list query
    ///
    /// Under-privileged modes are narrowed, never rejected. Collaborator failures yield
    /// a filter that matches nothing and report a mode the user can hold. Only an
    /// unregistered entity type or a deleted requesting user is returned as an error.
    pub async fn build_filter_predicate(
        &self,
        scope: &RequestScope,
        user: &User,
        requested: OwnershipFilter,
        entity_type: &EntityType,
    ) -> Result<ListAuthorization> {
        self.registry.resolve(entity_type)?;

        if user.is_deleted() {
            return Err(AccessError::not_found(format!("User {} is deleted", user.id)));
        }

        let resolution = match self
            .resolve_mode(scope, user, requested, entity_type)
            .await
        {
            Ok(resolution) => resolution,
            Err(e) if e.is_upstream_failure() => {
                let resolution = ModeResolution::unresolved(requested);
                return Ok(fail_closed(user, entity_type, requested, resolution, e));
            }
            Err(e) => return Err(e),
        };
        if let Some(downgrade) = &resolution.downgrade {
            debug!(
                user_id = %user.id,
                from = %downgrade.from,
                to = %downgrade.to,
                reason = ?downgrade.reason,
                "Requested mode downgraded"
            );
        }

        match self.filter_scope(scope, user, entity_type, &resolution).await {
            Ok(filter_scope) => Ok(ListAuthorization {
                requested,
                effective: resolution.effective,
                filter: EffectiveFilter::new(user, entity_type.clone(), filter_scope),
                downgrade: resolution.downgrade,
                upstream_failure: None,
            }),
            Err(e) if e.is_upstream_failure() => {
                Ok(fail_closed(user, entity_type, requested, resolution, e))
            }
            Err(e) => Err(e),
        }
    }

    async fn filter_scope(
        &self,
        scope: &RequestScope,
        user: &User,
        entity_type: &EntityType,
        resolution: &ModeResolution,
    ) -> Result<FilterScope> {
        Ok(match resolution.effective {
            OwnershipFilter::MyItems => owned_by([user.id]),
            OwnershipFilter::MyTeam => owned_by(self.team_owners(scope, user).await?),
            OwnershipFilter::Consulted => {
                if self.has_consulted_items(user, entity_type).await? {
                    consulted_by(user.id)
                } else {
                    FilterScope::Nothing
                }
            }
            OwnershipFilter::AllAccessible => {
                let owners = if resolution.team_visible {
                    self.team_owners(scope, user).await?
                } else {
                    BTreeSet::from([user.id])
                };
                if self.policy.prune_consulted_clause
                    && !self.has_consulted_items(user, entity_type).await?
                {
                    owned_by(owners)
                } else {
                    FilterScope::Union {
                        branches: vec![owned_by(owners), consulted_by(user.id)],
                    }
                }
            }
            OwnershipFilter::AllOrg => FilterScope::OrgWide,
        })
    }

    async fn resolve_mode(
        &self,
        scope: &RequestScope,
        user: &User,
        requested: OwnershipFilter,
        entity_type: &EntityType,
    ) -> Result<ModeResolution> {
        let needs_privilege = matches!(
            requested,
            OwnershipFilter::MyTeam | OwnershipFilter::AllAccessible | OwnershipFilter::AllOrg
        );
        if !needs_privilege {
            return Ok(ModeResolution {
                effective: requested,
                downgrade: None,
                team_visible: false,
            });
        }

        let overrides = self.overrides(scope, user, entity_type).await?;
        let is_admin = self.policy.is_admin(user.role);
        let is_manager = self.hierarchy.is_manager(scope, user).await?;
        let team_visible = overrides.resolve(OverrideScope::Team, is_manager);

        let (effective, reason) = match requested {
            OwnershipFilter::AllOrg
                if !overrides.resolve(OverrideScope::Org, is_admin || is_manager) =>
            {
                let reason = if overrides.revokes(OverrideScope::Org) {
                    DowngradeReason::OverrideRevoked
                } else {
                    DowngradeReason::NotManagerOrAdmin
                };
                (OwnershipFilter::AllAccessible, Some(reason))
            }
            OwnershipFilter::MyTeam if !team_visible => {
                let reason = if overrides.revokes(OverrideScope::Team) {
                    DowngradeReason::OverrideRevoked
                } else {
                    DowngradeReason::NotManager
                };
                (OwnershipFilter::MyItems, Some(reason))
            }
            mode => (mode, None),
        };

        Ok(ModeResolution {
            effective,
            downgrade: reason.map(|reason| Downgrade {
                from: requested,
                to: effective,
                reason,
            }),
            team_visible,
        })
    }

    async fn overrides(
        &self,
        scope: &RequestScope,
        user: &User,
        entity_type: &EntityType,
    ) -> Result<EffectiveOverrides> {
        let at = scope.evaluated_at();
        let overrides = self
            .directory
            .active_overrides(user.organization_id, user.id, at)
            .await?;
        Ok(EffectiveOverrides::collect(&overrides, entity_type, at))
    }

    async fn team_owners(&self, scope: &RequestScope, user: &User) -> Result<BTreeSet<UserId>> {
        let managed = self.hierarchy.managed_user_ids(scope, user).await?;
        Ok(managed
            .iter()
            .copied()
            .chain(std::iter::once(user.id))
            .collect())
    }

    async fn has_consulted_items(&self, user: &User, entity_type: &EntityType) -> Result<bool> {
        self.owners
            .has_visibility_assignments(user.id, entity_type, &CONSULTED_VISIBILITY)
            .await
    }
}

impl std::fmt::Debug for FilterEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterEvaluator")
            .field("policy", &self.policy)
            .field("entities", &self.registry.len())
            .finish_non_exhaustive()
    }
}

fn fail_closed(
    user: &User,
    entity_type: &EntityType,
    requested: OwnershipFilter,
    resolution: ModeResolution,
    error: AccessError,
) -> ListAuthorization {
    warn!(
        user_id = %user.id,
        entity_type = %entity_type,
        mode = %requested,
        effective = %resolution.effective,
        error = %error,
        "Upstream data unavailable, failing closed"
    );
    ListAuthorization {
        requested,
        effective: resolution.effective,
        filter: EffectiveFilter::nothing(user, entity_type.clone()),
        downgrade: resolution.downgrade,
        upstream_failure: Some(UpstreamFailure {
            code: error.code(),
            message: error.to_string(),
        }),
    }
}

fn owned_by(owners: impl IntoIterator<Item = UserId>) -> FilterScope {
    FilterScope::OwnedBy {
        owners: owners.into_iter().collect(),
    }
}

fn consulted_by(user_id: UserId) -> FilterScope {
    FilterScope::ConsultedBy {
        user_id,
        kinds: CONSULTED_VISIBILITY.to_vec(),
    }
}
