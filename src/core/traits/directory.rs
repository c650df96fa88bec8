//! Directory (identity + org chart) trait definition

use crate::core::models::{OrganizationId, PermissionOverride, ReportingEdge, User, UserId};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Source of users, reporting lines and permission overrides
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Look up a user, including soft-deleted ones
    async fn find_user(&self, user_id: UserId) -> Result<Option<User>>;

    /// Reporting edges of every non-deleted member of an organization
    async fn reporting_edges(&self, organization_id: OrganizationId) -> Result<Vec<ReportingEdge>>;

    /// Overrides for a user that are in force at `at`
    async fn active_overrides(
        &self,
        organization_id: OrganizationId,
        user_id: UserId,
        at: DateTime<Utc>,
    ) -> Result<Vec<PermissionOverride>>;
}
