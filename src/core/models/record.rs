//! Entity records subject to ownership scoping

use super::ids::{OrganizationId, RecordId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity type key (`job`, `lead`, `deal`, ...)
///
/// Entity types are open-ended strings at the API boundary; whether a given key is
/// recognized is decided by the configured [`EntityRegistry`](crate::config::EntityRegistry).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityType(String);

impl EntityType {
    /// Create an entity type key
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    /// Key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Ownership-relevant projection of an entity record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Record ID
    pub id: RecordId,
    /// Entity type of the record
    pub entity_type: EntityType,
    /// Owning organization
    pub organization_id: OrganizationId,
    /// Primary owner
    #[serde(default)]
    pub owner_id: Option<UserId>,
    /// Soft-delete marker
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Human readable label, for diagnostics only
    #[serde(default)]
    pub label: Option<String>,
}

impl EntityRecord {
    /// Create a live record owned by `owner_id`
    pub fn new(entity_type: EntityType, organization_id: OrganizationId, owner_id: UserId) -> Self {
        Self {
            id: RecordId::new(),
            entity_type,
            organization_id,
            owner_id: Some(owner_id),
            deleted_at: None,
            label: None,
        }
    }

    /// Set the diagnostic label
    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Whether the record has been soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
