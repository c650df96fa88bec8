//! RCAI ownership assignments

use super::ids::{RecordId, UserId};
use super::record::EntityType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Relationship of a user to a record (Responsible/Consulted/Accountable/Informed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipKind {
    /// Primary owner; at most one per record
    Responsible,
    /// Accountable for the outcome
    Accountable,
    /// Consulted on the record
    Consulted,
    /// Kept informed of the record
    Informed,
}

/// Kinds that grant visibility under the `consulted` filter
pub const CONSULTED_VISIBILITY: [OwnershipKind; 2] =
    [OwnershipKind::Consulted, OwnershipKind::Informed];

impl OwnershipKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnershipKind::Responsible => "responsible",
            OwnershipKind::Accountable => "accountable",
            OwnershipKind::Consulted => "consulted",
            OwnershipKind::Informed => "informed",
        }
    }

    /// Parse a wire name
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "responsible" => Some(OwnershipKind::Responsible),
            "accountable" => Some(OwnershipKind::Accountable),
            "consulted" => Some(OwnershipKind::Consulted),
            "informed" => Some(OwnershipKind::Informed),
            _ => None,
        }
    }

    /// Whether this is the primary-owner kind
    pub fn is_primary(&self) -> bool {
        matches!(self, OwnershipKind::Responsible)
    }
}

impl std::fmt::Display for OwnershipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user's relationship to one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipAssignment {
    /// Assigned user
    pub user_id: UserId,
    /// Entity type of the record
    pub entity_type: EntityType,
    /// Record ID
    pub record_id: RecordId,
    /// Relationship kind
    pub kind: OwnershipKind,
    /// When the assignment was made
    pub assigned_at: DateTime<Utc>,
}

impl OwnershipAssignment {
    /// Create an assignment stamped with the current time
    pub fn new(
        user_id: UserId,
        entity_type: EntityType,
        record_id: RecordId,
        kind: OwnershipKind,
    ) -> Self {
        Self {
            user_id,
            entity_type,
            record_id,
            kind,
            assigned_at: Utc::now(),
        }
    }
}
