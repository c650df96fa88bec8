//! Mutation decision types

use crate::core::filter::ListAuthorization;
use crate::core::models::EntityRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Write operation being authorized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationAction {
    Update,
    Delete,
    Reassign,
}

impl MutationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Reassign => "reassign",
        }
    }
}

impl fmt::Display for MutationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MutationAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "reassign" => Ok(Self::Reassign),
            other => Err(format!("Unknown mutation action '{}'", other)),
        }
    }
}

/// Why a mutation was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenyReason {
    /// User neither owns the record nor manages its owner
    NotOwner,
    /// User is a manager, but not of the record's owner
    NotManagerOfOwner,
    /// User's role may not mutate records
    InsufficientRole,
    /// Record is missing, deleted or belongs to another organization
    RecordNotFound,
    /// A collaborator failed; the decision fails closed
    UpstreamUnavailable,
}

impl DenyReason {
    /// Stable reason code
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotOwner => "NOT_OWNER",
            Self::NotManagerOfOwner => "NOT_MANAGER_OF_OWNER",
            Self::InsufficientRole => "INSUFFICIENT_ROLE",
            Self::RecordNotFound => "RECORD_NOT_FOUND",
            Self::UpstreamUnavailable => "UPSTREAM_UNAVAILABLE",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of a mutation check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Deny reason, if denied
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Self::Allow => None,
            Self::Deny(reason) => Some(*reason),
        }
    }
}

/// Records returned by an authorized list query, with the authorization used
#[derive(Debug, Clone, Serialize)]
pub struct ListQueryResult {
    pub authorization: ListAuthorization,
    pub records: Vec<EntityRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_serialization() {
        let deny = Decision::Deny(DenyReason::NotManagerOfOwner);
        let json = serde_json::to_value(deny).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"decision": "deny", "reason": "NOT_MANAGER_OF_OWNER"})
        );

        let allow = serde_json::to_value(Decision::Allow).unwrap();
        assert_eq!(allow, serde_json::json!({"decision": "allow"}));
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("reassign".parse::<MutationAction>(), Ok(MutationAction::Reassign));
        assert!("archive".parse::<MutationAction>().is_err());
    }

    #[test]
    fn test_reason_codes_match_serde() {
        for reason in [
            DenyReason::NotOwner,
            DenyReason::NotManagerOfOwner,
            DenyReason::InsufficientRole,
            DenyReason::RecordNotFound,
            DenyReason::UpstreamUnavailable,
        ] {
            let json = serde_json::to_value(reason).unwrap();
            assert_eq!(json, serde_json::Value::String(reason.code().to_string()));
        }
    }
}
