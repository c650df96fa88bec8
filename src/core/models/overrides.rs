//! Per-user permission overrides
//!
//! Administrators can widen (or narrow) a single user's list visibility without changing
//! their role: for example granting a recruiter organization-wide visibility on `job`
//! while covering for a colleague, with an expiry date.

use super::ids::{OrganizationId, OverrideId, UserId};
use super::record::EntityType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum length of the justification recorded with an override
pub const MIN_OVERRIDE_REASON_LEN: usize = 10;

/// Visibility scope an override grants or revokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideScope {
    /// Team (`my_team`) visibility
    Team,
    /// Organization-wide (`all_org`) visibility
    Org,
}

impl OverrideScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverrideScope::Team => "team",
            OverrideScope::Org => "org",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "team" => Some(OverrideScope::Team),
            "org" => Some(OverrideScope::Org),
            _ => None,
        }
    }
}

/// A grant or revocation of a visibility scope for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverride {
    /// Override ID
    #[serde(default)]
    pub id: OverrideId,
    /// Organization the override lives in
    pub organization_id: OrganizationId,
    /// User the override applies to
    pub user_id: UserId,
    /// Entity type it applies to; `None` means every entity type
    #[serde(default)]
    pub entity_type: Option<EntityType>,
    /// Scope granted or revoked
    pub scope: OverrideScope,
    /// `true` grants the scope, `false` revokes it
    pub granted: bool,
    /// Justification
    pub reason: String,
    /// Expiry
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Revocation time
    #[serde(default)]
    pub revoked_at: Option<DateTime<Utc>>,
}

impl PermissionOverride {
    /// Whether the override is in force at `at`
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        if self.revoked_at.is_some_and(|revoked| revoked <= at) {
            return false;
        }
        !self.expires_at.is_some_and(|expires| expires <= at)
    }

    /// Whether the override covers `entity_type`
    pub fn applies_to(&self, entity_type: &EntityType) -> bool {
        self.entity_type
            .as_ref()
            .is_none_or(|target| target == entity_type)
    }
}
