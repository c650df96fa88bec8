//! Effective filter types

use crate::core::models::{
    EntityType, OrganizationId, OwnershipFilter, OwnershipKind, User, UserId,
};
use serde::Serialize;
use std::collections::BTreeSet;

/// Tenant isolation predicate: `organization_id == org AND deleted_at IS NULL`
///
/// Only constructible from the requesting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TenantGuard {
    organization_id: OrganizationId,
}

impl TenantGuard {
    pub(crate) fn for_user(user: &User) -> Self {
        Self {
            organization_id: user.organization_id,
        }
    }

    /// Organization every matching record must belong to
    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    /// Soft-deleted records never match
    pub fn excludes_deleted(&self) -> bool {
        true
    }
}

/// Row restriction on top of the tenant guard
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterScope {
    /// Primary owner is one of the users
    OwnedBy {
        /// Accepted owners
        owners: BTreeSet<UserId>,
    },
    /// The user holds an assignment of one of the kinds on the record
    ConsultedBy {
        /// Assigned user
        user_id: UserId,
        /// Accepted assignment kinds
        kinds: Vec<OwnershipKind>,
    },
    /// Any of the branches matches
    Union {
        /// Branches
        branches: Vec<FilterScope>,
    },
    /// No restriction beyond the tenant guard
    OrgWide,
    /// Nothing matches
    ///
    /// Also produced by `consulted` when the user holds no Consulted or Informed
    /// assignment on the entity type, and by every fail-closed authorization.
    Nothing,
}

impl FilterScope {
    /// Whether the scope can never match
    pub fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }
}

/// Privilege-checked, declarative predicate for one list query
///
/// Constructors are crate-private; a filter always carries the guard of the user it
/// was built for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EffectiveFilter {
    guard: TenantGuard,
    entity_type: EntityType,
    scope: FilterScope,
}

impl EffectiveFilter {
    pub(crate) fn new(user: &User, entity_type: EntityType, scope: FilterScope) -> Self {
        Self {
            guard: TenantGuard::for_user(user),
            entity_type,
            scope,
        }
    }

    pub(crate) fn owned_by(
        user: &User,
        entity_type: EntityType,
        owners: impl IntoIterator<Item = UserId>,
    ) -> Self {
        Self::new(
            user,
            entity_type,
            FilterScope::OwnedBy {
                owners: owners.into_iter().collect(),
            },
        )
    }

    pub(crate) fn nothing(user: &User, entity_type: EntityType) -> Self {
        Self::new(user, entity_type, FilterScope::Nothing)
    }

    /// Tenant guard
    pub fn guard(&self) -> &TenantGuard {
        &self.guard
    }

    /// Organization the filter is pinned to
    pub fn organization_id(&self) -> OrganizationId {
        self.guard.organization_id
    }

    /// Entity type being listed
    pub fn entity_type(&self) -> &EntityType {
        &self.entity_type
    }

    /// Row restriction
    pub fn scope(&self) -> &FilterScope {
        &self.scope
    }

    /// Whether the filter can never match
    pub fn is_nothing(&self) -> bool {
        self.scope.is_nothing()
    }
}

/// Why a requested mode was narrowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DowngradeReason {
    /// Organization-wide visibility needs a manager or admin
    NotManagerOrAdmin,
    /// Team visibility needs a manager
    NotManager,
    /// An active override revokes the scope
    OverrideRevoked,
    /// Privileges could not be resolved because a collaborator failed
    PrivilegeUnavailable,
}

/// A narrowing of the requested mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Downgrade {
    /// Mode the caller asked for
    pub from: OwnershipFilter,
    /// Mode actually applied
    pub to: OwnershipFilter,
    /// Why
    pub reason: DowngradeReason,
}

/// Collaborator failure that forced a fail-closed filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpstreamFailure {
    /// Stable error code
    pub code: &'static str,
    /// Failure detail
    pub message: String,
}

/// Outcome of authorizing a list query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListAuthorization {
    /// Mode the caller asked for
    pub requested: OwnershipFilter,
    /// Mode actually applied
    pub effective: OwnershipFilter,
    /// Filter the query executor must apply
    pub filter: EffectiveFilter,
    /// Present when the requested mode was narrowed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downgrade: Option<Downgrade>,
    /// Present when a collaborator failure forced an empty result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_failure: Option<UpstreamFailure>,
}

impl ListAuthorization {
    /// Whether the requested mode was narrowed
    pub fn was_downgraded(&self) -> bool {
        self.downgrade.is_some()
    }

    /// Whether the filter is a fail-closed result of a collaborator failure
    pub fn is_fail_closed(&self) -> bool {
        self.upstream_failure.is_some()
    }
}
