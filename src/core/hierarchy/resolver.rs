//! Hierarchy resolver implementation

use super::cache::{RequestScope, SharedHierarchyCache};
use super::chart::OrgChart;
use crate::config::PolicyConfig;
use crate::core::models::{OrganizationId, User, UserId};
use crate::core::traits::DirectoryStore;
use crate::utils::error::{AccessError, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Resolves manager chains and report sets from the directory
#[derive(Clone)]
pub struct HierarchyResolver {
    directory: Arc<dyn DirectoryStore>,
    policy: Arc<PolicyConfig>,
    shared: Option<SharedHierarchyCache>,
}

impl HierarchyResolver {
    /// Create a resolver without a cross-request cache
    pub fn new(directory: Arc<dyn DirectoryStore>, policy: Arc<PolicyConfig>) -> Self {
        Self {
            directory,
            policy,
            shared: None,
        }
    }

    /// Attach a cross-request org-chart cache
    pub fn with_shared_cache(mut self, cache: SharedHierarchyCache) -> Self {
        self.shared = Some(cache);
        self
    }

    /// The attached cross-request cache, if any
    pub fn shared_cache(&self) -> Option<&SharedHierarchyCache> {
        self.shared.as_ref()
    }

    /// Transitive reports of a user looked up by id
    ///
    /// The user must exist and not be deleted.
    pub async fn resolve_managed_user_ids(
        &self,
        scope: &RequestScope,
        user_id: UserId,
    ) -> Result<Arc<HashSet<UserId>>> {
        if let Some(closure) = scope.closure(user_id) {
            return Ok(closure);
        }

        let user = self
            .directory
            .find_user(user_id)
            .await?
            .filter(|user| !user.is_deleted())
            .ok_or_else(|| AccessError::not_found(format!("User {} not found", user_id)))?;

        self.managed_user_ids(scope, &user).await
    }

    /// Transitive reports of an already authenticated user
    pub async fn managed_user_ids(
        &self,
        scope: &RequestScope,
        user: &User,
    ) -> Result<Arc<HashSet<UserId>>> {
        if let Some(closure) = scope.closure(user.id) {
            return Ok(closure);
        }

        let chart = self.org_chart(scope, user.organization_id).await?;
        let closure = Arc::new(chart.closure(user.id));
        debug!(
            user_id = %user.id,
            reports = closure.len(),
            "Resolved managed users"
        );

        scope.store_closure(user.id, closure.clone());
        Ok(closure)
    }

    /// Whether the user holds manager privileges
    ///
    /// True for an explicit manager role even without reports, and for anyone with at
    /// least one report.
    pub async fn is_manager(&self, scope: &RequestScope, user: &User) -> Result<bool> {
        if self.policy.is_manager_role(user.role) {
            return Ok(true);
        }
        Ok(!self.managed_user_ids(scope, user).await?.is_empty())
    }

    async fn org_chart(
        &self,
        scope: &RequestScope,
        organization_id: OrganizationId,
    ) -> Result<Arc<OrgChart>> {
        if let Some(chart) = scope.chart(organization_id) {
            return Ok(chart);
        }

        if let Some(shared) = &self.shared {
            if let Some(chart) = shared.get(organization_id).await {
                debug!(organization_id = %organization_id, "Org chart served from shared cache");
                scope.store_chart(organization_id, chart.clone());
                return Ok(chart);
            }
        }

        let edges = self.directory.reporting_edges(organization_id).await?;
        let chart = Arc::new(OrgChart::from_edges(&edges));
        debug!(
            organization_id = %organization_id,
            members = chart.len(),
            "Loaded org chart"
        );

        if let Some(shared) = &self.shared {
            shared.insert(organization_id, chart.clone()).await;
        }
        scope.store_chart(organization_id, chart.clone());
        Ok(chart)
    }
}

impl std::fmt::Debug for HierarchyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HierarchyResolver")
            .field("shared", &self.shared)
            .finish_non_exhaustive()
    }
}
