//! Org-chart caching configuration

use serde::{Deserialize, Serialize};

/// Hierarchy resolution settings
///
/// Org charts are always memoized for the lifetime of one request. The shared cache
/// additionally keeps them across requests and must be paired with invalidation events
/// from whatever reassigns managers or changes membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// Keep org charts across requests
    #[serde(default)]
    pub shared_cache: bool,
    /// Upper bound on how long a shared entry may live, in seconds
    #[serde(default = "default_shared_cache_ttl")]
    pub shared_cache_ttl_secs: u64,
    /// Maximum number of organizations kept in the shared cache
    #[serde(default = "default_shared_cache_capacity")]
    pub shared_cache_capacity: u64,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            shared_cache: false,
            shared_cache_ttl_secs: default_shared_cache_ttl(),
            shared_cache_capacity: default_shared_cache_capacity(),
        }
    }
}

impl HierarchyConfig {
    /// Merge hierarchy configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.shared_cache {
            self.shared_cache = true;
        }
        if other.shared_cache_ttl_secs != default_shared_cache_ttl() {
            self.shared_cache_ttl_secs = other.shared_cache_ttl_secs;
        }
        if other.shared_cache_capacity != default_shared_cache_capacity() {
            self.shared_cache_capacity = other.shared_cache_capacity;
        }
        self
    }
}

fn default_shared_cache_ttl() -> u64 {
    60
}

fn default_shared_cache_capacity() -> u64 {
    10_000
}
