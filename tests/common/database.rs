//! Test database utilities
//!
//! Provides in-memory SQLite database for testing without external dependencies.
//! Each test gets an isolated database instance using SeaORM.

use intime_access::config::{DatabaseConfig, EntityRegistry, default_entities};
use intime_access::storage::database::Database;
use intime_access::storage::memory::Snapshot;
use std::sync::Arc;

/// Test database wrapper providing isolated in-memory SQLite instances
#[derive(Debug, Clone)]
pub struct TestDatabase {
    inner: Arc<Database>,
}

impl TestDatabase {
    /// Create a new in-memory test database with the default entity registry
    ///
    /// Note: This uses SQLite in-memory mode which requires the 'sqlite' feature.
    /// Each call creates a completely isolated database instance.
    pub async fn new() -> Self {
        let registry = Arc::new(EntityRegistry::new(&default_entities()));
        let db = Database::new(&test_db_config(), registry)
            .await
            .expect("Failed to create in-memory test database");

        // Run migrations
        db.migrate()
            .await
            .expect("Failed to run database migrations");

        Self {
            inner: Arc::new(db),
        }
    }

    /// Create a test database holding a snapshot
    pub async fn seeded(snapshot: &Snapshot) -> Self {
        let db = Self::new().await;
        db.seed(snapshot).await;
        db
    }

    /// Import a snapshot
    pub async fn seed(&self, snapshot: &Snapshot) {
        self.inner
            .import_snapshot(snapshot)
            .await
            .expect("Failed to seed test database");
    }

    /// Get reference to the underlying database
    pub fn db(&self) -> &Database {
        &self.inner
    }

    /// Get Arc to the underlying database
    pub fn db_arc(&self) -> Arc<Database> {
        Arc::clone(&self.inner)
    }
}

/// Helper to create a simple test database config
pub fn test_db_config() -> DatabaseConfig {
    DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1, // In-memory DB only supports 1 connection
        connection_timeout: 5,
        enabled: true,
    }
}
