use crate::config::EntityRegistry;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// SeaORM-backed directory, ownership store and query executor
///
/// Entity tables are addressed through the registry; the three bookkeeping tables
/// (`user_profiles`, `object_owners`, `permission_overrides`) are SeaORM entities.
#[derive(Debug)]
pub struct SeaOrmDatabase {
    pub(super) db: DatabaseConnection,
    /// Backend type indicator
    pub(super) backend_type: DatabaseBackendType,
    pub(super) registry: Arc<EntityRegistry>,
}

/// Database backend type indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackendType {
    PostgreSQL,
    SQLite,
}

/// Row counts of the bookkeeping tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseStats {
    /// Users, deleted ones included
    pub users: u64,
    /// Ownership assignments
    pub assignments: u64,
    /// Permission overrides, revoked ones included
    pub overrides: u64,
}
