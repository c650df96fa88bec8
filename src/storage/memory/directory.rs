//! In-memory directory

use crate::core::models::{
    MIN_OVERRIDE_REASON_LEN, OrganizationId, OverrideId, PermissionOverride, ReportingEdge, User,
    UserId,
};
use crate::core::hierarchy::closes_cycle;
use crate::core::traits::DirectoryStore;
use crate::utils::error::{AccessError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

/// Users and permission overrides held in memory
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: DashMap<UserId, User>,
    overrides: DashMap<OverrideId, PermissionOverride>,
}

impl InMemoryDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user
    pub fn upsert_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    /// Change a user's manager
    ///
    /// The manager must be a live member of the same organization and must not report
    /// to the user, directly or transitively.
    pub fn set_manager(&self, user_id: UserId, manager_id: Option<UserId>) -> Result<()> {
        let organization_id = self
            .users
            .get(&user_id)
            .map(|user| user.organization_id)
            .ok_or_else(|| AccessError::not_found(format!("User {} not found", user_id)))?;

        if let Some(manager_id) = manager_id {
            let manager_ok = self.users.get(&manager_id).is_some_and(|manager| {
                manager.organization_id == organization_id && !manager.is_deleted()
            });
            if !manager_ok {
                return Err(AccessError::validation(format!(
                    "Manager {} is not a live member of organization {}",
                    manager_id, organization_id
                )));
            }
            let manager_of = |id: UserId| self.users.get(&id).and_then(|user| user.manager_id);
            if closes_cycle(user_id, manager_id, manager_of) {
                return Err(AccessError::validation(format!(
                    "Manager {} reports to user {}, reassignment would create a cycle",
                    manager_id, user_id
                )));
            }
        }

        if let Some(mut user) = self.users.get_mut(&user_id) {
            user.manager_id = manager_id;
        }
        debug!(user_id = %user_id, manager_id = ?manager_id, "Manager reassigned");
        Ok(())
    }

    /// Mark a user deleted
    pub fn soft_delete_user(&self, user_id: UserId, at: DateTime<Utc>) -> Result<()> {
        let mut user = self
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AccessError::not_found(format!("User {} not found", user_id)))?;
        user.deleted_at = Some(at);
        Ok(())
    }

    /// Record a permission override
    pub fn insert_override(&self, permission_override: PermissionOverride) -> Result<()> {
        if permission_override.reason.trim().chars().count() < MIN_OVERRIDE_REASON_LEN {
            return Err(AccessError::validation(format!(
                "Override reason must be at least {} characters",
                MIN_OVERRIDE_REASON_LEN
            )));
        }
        let user_org = self
            .users
            .get(&permission_override.user_id)
            .map(|user| user.organization_id);
        if user_org != Some(permission_override.organization_id) {
            return Err(AccessError::validation(
                "Override user must belong to the override's organization",
            ));
        }
        self.overrides
            .insert(permission_override.id, permission_override);
        Ok(())
    }

    /// Revoke an override from `at` onwards
    pub fn revoke_override(&self, id: OverrideId, at: DateTime<Utc>) -> Result<()> {
        let mut entry = self
            .overrides
            .get_mut(&id)
            .ok_or_else(|| AccessError::not_found(format!("Override {} not found", id)))?;
        if entry.revoked_at.is_none() {
            entry.revoked_at = Some(at);
        }
        Ok(())
    }

    /// Number of users, deleted ones included
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl DirectoryStore for InMemoryDirectory {
    async fn find_user(&self, user_id: UserId) -> Result<Option<User>> {
        Ok(self.users.get(&user_id).map(|user| user.clone()))
    }

    async fn reporting_edges(&self, organization_id: OrganizationId) -> Result<Vec<ReportingEdge>> {
        Ok(self
            .users
            .iter()
            .filter(|user| user.organization_id == organization_id && !user.is_deleted())
            .map(|user| user.reporting_edge())
            .collect())
    }

    async fn active_overrides(
        &self,
        organization_id: OrganizationId,
        user_id: UserId,
        at: DateTime<Utc>,
    ) -> Result<Vec<PermissionOverride>> {
        Ok(self
            .overrides
            .iter()
            .filter(|o| {
                o.organization_id == organization_id && o.user_id == user_id && o.is_active_at(at)
            })
            .map(|o| o.clone())
            .collect())
    }
}
