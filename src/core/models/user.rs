//! Users, organizations and role tags

use super::ids::{OrganizationId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated user context, supplied by the identity/session provider for each request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID
    pub id: UserId,
    /// Organization the user belongs to
    pub organization_id: OrganizationId,
    /// Direct manager, if any
    #[serde(default)]
    pub manager_id: Option<UserId>,
    /// Role tag
    pub role: UserRole,
    /// Display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Soft-delete marker
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create an active user in an organization
    pub fn new(organization_id: OrganizationId, role: UserRole) -> Self {
        Self {
            id: UserId::new(),
            organization_id,
            manager_id: None,
            role,
            display_name: None,
            deleted_at: None,
        }
    }

    /// Set the direct manager
    pub fn with_manager(mut self, manager_id: UserId) -> Self {
        self.manager_id = Some(manager_id);
        self
    }

    /// Set the display name
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Whether the user has been soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Reporting edge of this user
    pub fn reporting_edge(&self) -> ReportingEdge {
        ReportingEdge {
            user_id: self.id,
            manager_id: self.manager_id,
        }
    }
}

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Platform administrator
    SuperAdmin,
    /// Organization administrator
    Admin,
    /// People manager
    Manager,
    /// Individual contributor (recruiter, account manager, ...)
    Member,
    /// Read-only user
    Viewer,
}

impl UserRole {
    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "super_admin",
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::Member => "member",
            UserRole::Viewer => "viewer",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(UserRole::SuperAdmin),
            "admin" => Ok(UserRole::Admin),
            "manager" => Ok(UserRole::Manager),
            "member" => Ok(UserRole::Member),
            "viewer" => Ok(UserRole::Viewer),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

/// Organization (tenant)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization ID
    pub id: OrganizationId,
    /// Organization name
    pub name: String,
}

/// A `(user, manager)` edge of the org chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingEdge {
    /// Reporting user
    pub user_id: UserId,
    /// Their direct manager
    pub manager_id: Option<UserId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [
            UserRole::SuperAdmin,
            UserRole::Admin,
            UserRole::Manager,
            UserRole::Member,
            UserRole::Viewer,
        ] {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), role);
        }
        assert!("owner".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_user_builder() {
        let org = OrganizationId::new();
        let manager = User::new(org, UserRole::Manager);
        let report = User::new(org, UserRole::Member)
            .with_manager(manager.id)
            .with_name("Riley");

        assert_eq!(report.manager_id, Some(manager.id));
        assert_eq!(report.display_name.as_deref(), Some("Riley"));
        assert!(!report.is_deleted());
        assert_eq!(report.reporting_edge().manager_id, Some(manager.id));
    }
}
