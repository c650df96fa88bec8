//! Policy configuration

use crate::core::models::{OwnershipFilter, UserRole};
use serde::{Deserialize, Serialize};

/// Role classification and filter behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Roles with organization-wide visibility and unrestricted mutation
    #[serde(default = "default_admin_roles")]
    pub admin_roles: Vec<String>,
    /// Roles that carry manager privileges even without current reports
    #[serde(default = "default_manager_roles")]
    pub manager_roles: Vec<String>,
    /// Roles that may never mutate records
    #[serde(default = "default_read_only_roles")]
    pub read_only_roles: Vec<String>,
    /// Mode used when a list request does not name one
    #[serde(default)]
    pub default_mode: OwnershipFilter,
    /// Drop the consulted half of `all_accessible` when the user has no
    /// consulted/informed assignments on the entity type
    #[serde(default)]
    pub prune_consulted_clause: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            admin_roles: default_admin_roles(),
            manager_roles: default_manager_roles(),
            read_only_roles: default_read_only_roles(),
            default_mode: OwnershipFilter::default(),
            prune_consulted_clause: false,
        }
    }
}

impl PolicyConfig {
    /// Whether `role` is an admin role
    pub fn is_admin(&self, role: UserRole) -> bool {
        self.admin_roles.iter().any(|r| r == role.as_str())
    }

    /// Whether `role` carries the explicit manager flag
    pub fn is_manager_role(&self, role: UserRole) -> bool {
        self.manager_roles.iter().any(|r| r == role.as_str())
    }

    /// Whether `role` is read-only
    pub fn is_read_only(&self, role: UserRole) -> bool {
        self.read_only_roles.iter().any(|r| r == role.as_str())
    }

    /// Merge policy configurations (other takes precedence where it differs from defaults)
    pub fn merge(mut self, other: Self) -> Self {
        if other.admin_roles != default_admin_roles() {
            self.admin_roles = other.admin_roles;
        }
        if other.manager_roles != default_manager_roles() {
            self.manager_roles = other.manager_roles;
        }
        if other.read_only_roles != default_read_only_roles() {
            self.read_only_roles = other.read_only_roles;
        }
        if other.default_mode != OwnershipFilter::default() {
            self.default_mode = other.default_mode;
        }
        if other.prune_consulted_clause {
            self.prune_consulted_clause = true;
        }
        self
    }
}

fn default_admin_roles() -> Vec<String> {
    vec!["super_admin".to_string(), "admin".to_string()]
}

fn default_manager_roles() -> Vec<String> {
    vec!["manager".to_string()]
}

fn default_read_only_roles() -> Vec<String> {
    vec!["viewer".to_string()]
}
