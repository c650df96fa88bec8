// Module declarations
mod connection;
mod directory_ops;
mod ownership_ops;
mod query_ops;
mod seed_ops;
mod types;

// Re-export public types
pub use types::{DatabaseBackendType, DatabaseStats, SeaOrmDatabase};
