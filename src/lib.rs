//! # InTime Access
//!
//! Ownership-scoped access control for a multi-tenant staffing platform.
//!
//! ## Features
//!
//! - **Hierarchy resolution**: Transitive report sets from the manager graph, cycle-safe
//! - **RCAI ownership index**: Responsible/Accountable/Consulted/Informed assignments
//! - **List filters**: Declarative, tenant-pinned predicates for five visibility modes
//! - **Mutation checks**: Owner, manager-of-owner and admin rules with typed denials
//! - **Permission overrides**: Expiring per-user grants and revocations
//! - **Fail-closed**: Collaborator outages never widen visibility
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use intime_access::{AccessEngine, Config};
//! use intime_access::core::models::{EntityType, OwnershipFilter, UserId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/access.yaml").await?;
//!     let engine = AccessEngine::new(config).await?;
//!
//!     let user = UserId::new();
//!     let result = engine
//!         .list(user, OwnershipFilter::MyTeam, &EntityType::from("job"))
//!         .await?;
//!     println!("{} records visible", result.records.len());
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

// Public module exports
pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{AccessError, Result};

// Export core functionality
pub use core::filter::{EffectiveFilter, FilterScope, ListAuthorization};
pub use core::models::{EntityType, OwnershipFilter, OwnershipKind, RecordId, User, UserId};
pub use core::policy::{AccessPolicy, Decision, DenyReason, ListQueryResult, MutationAction};
pub use storage::StorageLayer;

use tracing::info;

/// Access policy wired to its configured storage
#[derive(Debug, Clone)]
pub struct AccessEngine {
    config: Config,
    storage: StorageLayer,
    policy: AccessPolicy,
}

impl AccessEngine {
    /// Create an engine backed by the configured database
    ///
    /// Without an enabled database the engine starts on empty in-memory stores.
    pub async fn new(config: Config) -> Result<Self> {
        info!("Creating new access engine instance");

        let storage = if config.database().enabled {
            let registry = std::sync::Arc::new(config.registry());
            StorageLayer::connect(config.database(), registry).await?
        } else {
            StorageLayer::in_memory(storage::memory::Snapshot::default().load()?)
        };
        Ok(Self::with_storage(config, storage))
    }

    /// Create an engine on an existing storage layer
    pub fn with_storage(config: Config, storage: StorageLayer) -> Self {
        let policy = AccessPolicy::new(
            &config.access,
            storage.directory.clone(),
            storage.ownership.clone(),
        );
        Self {
            config,
            storage,
            policy,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Storage layer
    pub fn storage(&self) -> &StorageLayer {
        &self.storage
    }

    /// Access policy
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Look up a live user by ID
    pub async fn user(&self, user_id: UserId) -> Result<User> {
        self.storage
            .directory
            .find_user(user_id)
            .await?
            .filter(|user| !user.is_deleted())
            .ok_or_else(|| AccessError::not_found(format!("User {} not found", user_id)))
    }

    /// Authorize and run a list query for a user
    pub async fn list(
        &self,
        user_id: UserId,
        mode: OwnershipFilter,
        entity_type: &EntityType,
    ) -> Result<ListQueryResult> {
        let user = self.user(user_id).await?;
        self.policy
            .run_list_query(&user, mode, entity_type, self.storage.executor.as_ref())
            .await
    }

    /// Decide whether a user may mutate a record
    pub async fn check_mutation(
        &self,
        user_id: UserId,
        entity_type: &EntityType,
        record_id: RecordId,
        action: MutationAction,
    ) -> Result<Decision> {
        let user = self.user(user_id).await?;
        self.policy
            .authorize_mutation(&user, entity_type, record_id, action)
            .await
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
