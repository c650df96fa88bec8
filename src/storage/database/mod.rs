//! Database storage implementation using SeaORM
//!
//! This module provides database connectivity and the SQL-backed collaborators: the
//! directory, the ownership store and the filtered query executor.

// SeaORM implementation
/// Database entities module
pub mod entities;
/// Effective filter to SQL condition translation
pub mod filter_sql;
/// Database migration module
pub mod migration;
/// SeaORM database implementation module
pub mod seaorm_db;

// Re-export the main database interface
pub use filter_sql::filter_condition;
pub use seaorm_db::SeaOrmDatabase as Database;
pub use seaorm_db::{DatabaseBackendType, DatabaseStats};
