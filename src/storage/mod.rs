//! Storage layer for the access engine
//!
//! This module provides the data collaborators the policy engine reads through: a
//! SeaORM database for deployments and lock-sharded in-memory maps for tests and tools.

/// Database storage module
pub mod database;
/// In-memory storage module
pub mod memory;

use crate::config::{DatabaseConfig, EntityRegistry};
use crate::core::traits::{DirectoryStore, OwnershipStore, QueryExecutor};
use crate::utils::error::Result;
use memory::{InMemoryBackend, InMemoryQueryExecutor};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Storage layer wiring the three collaborators to one backend
#[derive(Clone)]
pub struct StorageLayer {
    /// Users, reporting lines and overrides
    pub directory: Arc<dyn DirectoryStore>,
    /// Records and RCAI assignments
    pub ownership: Arc<dyn OwnershipStore>,
    /// Filtered list queries
    pub executor: Arc<dyn QueryExecutor>,
    database: Option<Arc<database::Database>>,
}

impl StorageLayer {
    /// Connect to the configured database and run migrations
    pub async fn connect(config: &DatabaseConfig, registry: Arc<EntityRegistry>) -> Result<Self> {
        info!("Initializing database storage layer");

        debug!("Connecting to database");
        let database = Arc::new(database::Database::new(config, registry).await?);
        database.migrate().await?;

        info!("Storage layer initialized successfully");
        Ok(Self {
            directory: database.clone(),
            ownership: database.clone(),
            executor: database.clone(),
            database: Some(database),
        })
    }

    /// Serve collaborators from an in-memory backend
    pub fn in_memory(backend: InMemoryBackend) -> Self {
        debug!("Initializing in-memory storage layer");
        let executor = InMemoryQueryExecutor::new(backend.ownership.clone());
        Self {
            directory: backend.directory,
            ownership: backend.ownership,
            executor: Arc::new(executor),
            database: None,
        }
    }

    /// Database handle, when the layer is database-backed
    pub fn db(&self) -> Option<&database::Database> {
        self.database.as_deref()
    }

    /// Health check for the configured backend
    pub async fn health_check(&self) -> StorageHealthStatus {
        let database = match &self.database {
            Some(database) => match database.health_check().await {
                Ok(()) => true,
                Err(e) => {
                    warn!("Database health check failed: {}", e);
                    false
                }
            },
            // In-memory maps cannot be unreachable
            None => true,
        };

        StorageHealthStatus {
            backend: if self.database.is_some() {
                "database"
            } else {
                "memory"
            },
            database,
            overall: database,
        }
    }
}

impl fmt::Debug for StorageLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageLayer")
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}

/// Storage health status
#[derive(Debug, Clone, serde::Serialize)]
pub struct StorageHealthStatus {
    /// Backend kind (`database` or `memory`)
    pub backend: &'static str,
    /// Database health status
    pub database: bool,
    /// Overall health status
    pub overall: bool,
}
