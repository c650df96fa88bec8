//! Evaluation of permission overrides
//!
//! An override grants or revokes team or organization-wide visibility for one user,
//! optionally limited to one entity type. A revocation beats any grant and any
//! role-based privilege for the same scope.

use crate::core::models::{EntityType, OverrideScope, PermissionOverride};
use chrono::{DateTime, Utc};

/// Overrides in force for one user, entity type and instant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveOverrides {
    team_granted: bool,
    team_revoked: bool,
    org_granted: bool,
    org_revoked: bool,
}

impl EffectiveOverrides {
    /// Fold the overrides that apply to `entity_type` at `at`
    pub fn collect(
        overrides: &[PermissionOverride],
        entity_type: &EntityType,
        at: DateTime<Utc>,
    ) -> Self {
        overrides
            .iter()
            .filter(|o| o.is_active_at(at) && o.applies_to(entity_type))
            .fold(Self::default(), |mut acc, o| {
                match (o.scope, o.granted) {
                    (OverrideScope::Team, true) => acc.team_granted = true,
                    (OverrideScope::Team, false) => acc.team_revoked = true,
                    (OverrideScope::Org, true) => acc.org_granted = true,
                    (OverrideScope::Org, false) => acc.org_revoked = true,
                }
                acc
            })
    }

    /// Whether an active grant exists for the scope
    pub fn grants(&self, scope: OverrideScope) -> bool {
        match scope {
            OverrideScope::Team => self.team_granted,
            OverrideScope::Org => self.org_granted,
        }
    }

    /// Whether an active revocation exists for the scope
    pub fn revokes(&self, scope: OverrideScope) -> bool {
        match scope {
            OverrideScope::Team => self.team_revoked,
            OverrideScope::Org => self.org_revoked,
        }
    }

    /// Final privilege for a scope given the role-based privilege
    pub fn resolve(&self, scope: OverrideScope, role_privileged: bool) -> bool {
        !self.revokes(scope) && (role_privileged || self.grants(scope))
    }
}
