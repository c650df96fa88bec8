//! Org-chart caches
//!
//! [`RequestScope`] memoizes charts and closures for one request. [`SharedHierarchyCache`]
//! keeps charts across requests and is only correct when every manager reassignment and
//! membership change is reported through [`SharedHierarchyCache::handle_event`].

use super::chart::OrgChart;
use crate::config::HierarchyConfig;
use crate::core::models::{OrganizationId, UserId};
use chrono::{DateTime, Utc};
use moka::future::Cache;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Per-request memo of org charts and report closures
///
/// Also pins the evaluation instant, so every time-dependent check in one request
/// (override expiry) sees the same clock.
#[derive(Debug)]
pub struct RequestScope {
    evaluated_at: DateTime<Utc>,
    charts: Mutex<HashMap<OrganizationId, Arc<OrgChart>>>,
    closures: Mutex<HashMap<UserId, Arc<HashSet<UserId>>>>,
}

impl RequestScope {
    /// Scope evaluated at the current instant
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Scope evaluated at a fixed instant
    pub fn at(evaluated_at: DateTime<Utc>) -> Self {
        Self {
            evaluated_at,
            charts: Mutex::new(HashMap::new()),
            closures: Mutex::new(HashMap::new()),
        }
    }

    /// Instant used for every time-dependent check in this request
    pub fn evaluated_at(&self) -> DateTime<Utc> {
        self.evaluated_at
    }

    pub(crate) fn chart(&self, organization_id: OrganizationId) -> Option<Arc<OrgChart>> {
        self.charts.lock().get(&organization_id).cloned()
    }

    pub(crate) fn store_chart(&self, organization_id: OrganizationId, chart: Arc<OrgChart>) {
        self.charts.lock().insert(organization_id, chart);
    }

    pub(crate) fn closure(&self, user_id: UserId) -> Option<Arc<HashSet<UserId>>> {
        self.closures.lock().get(&user_id).cloned()
    }

    pub(crate) fn store_closure(&self, user_id: UserId, closure: Arc<HashSet<UserId>>) {
        self.closures.lock().insert(user_id, closure);
    }
}

impl Default for RequestScope {
    fn default() -> Self {
        Self::new()
    }
}

/// Change to the org structure that invalidates cached charts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyEvent {
    /// A user's manager changed
    ManagerReassigned {
        /// Organization of the user
        organization_id: OrganizationId,
        /// User whose manager changed
        user_id: UserId,
    },
    /// A user joined, left or was deleted from an organization
    MembershipChanged {
        /// Affected organization
        organization_id: OrganizationId,
    },
}

impl HierarchyEvent {
    /// Organization whose chart is stale
    pub fn organization_id(&self) -> OrganizationId {
        match self {
            Self::ManagerReassigned {
                organization_id, ..
            }
            | Self::MembershipChanged { organization_id } => *organization_id,
        }
    }
}

/// Cross-request org-chart cache with TTL bound and explicit invalidation
#[derive(Clone)]
pub struct SharedHierarchyCache {
    charts: Cache<OrganizationId, Arc<OrgChart>>,
}

impl SharedHierarchyCache {
    /// Create a cache from configuration
    pub fn new(config: &HierarchyConfig) -> Self {
        let charts = Cache::builder()
            .max_capacity(config.shared_cache_capacity)
            .time_to_live(Duration::from_secs(config.shared_cache_ttl_secs))
            .build();
        Self { charts }
    }

    /// Create a cache when the configuration enables one
    pub fn from_config(config: &HierarchyConfig) -> Option<Self> {
        config.shared_cache.then(|| Self::new(config))
    }

    pub(crate) async fn get(&self, organization_id: OrganizationId) -> Option<Arc<OrgChart>> {
        self.charts.get(&organization_id).await
    }

    pub(crate) async fn insert(&self, organization_id: OrganizationId, chart: Arc<OrgChart>) {
        self.charts.insert(organization_id, chart).await;
    }

    /// Drop the chart affected by an org-structure change
    pub async fn handle_event(&self, event: HierarchyEvent) {
        debug!(?event, "Invalidating cached org chart");
        self.charts.invalidate(&event.organization_id()).await;
    }

    /// Drop every cached chart
    pub fn invalidate_all(&self) {
        self.charts.invalidate_all();
    }
}

impl std::fmt::Debug for SharedHierarchyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedHierarchyCache")
            .field("entries", &self.charts.entry_count())
            .finish()
    }
}
