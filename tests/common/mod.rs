//! Common test utilities for intime-access
//!
//! This module provides shared test infrastructure for all tests:
//! - In-memory SQLite database support
//! - Organization fixtures and record factories
//! - Custom assertions and helpers
//!
//! # Usage
//!
//! ```rust
//! use crate::common::{TestDatabase, OrgFixture};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let db = TestDatabase::new().await;
//!     let org = OrgFixture::new();
//!     db.seed(&org.snapshot()).await;
//!     // ...
//! }
//! ```

pub mod assertions;
pub mod database;
pub mod fixtures;

// Re-export commonly used items
pub use assertions::ListResultAssertions;
pub use database::TestDatabase;
pub use fixtures::{OrgFixture, RecordFactory};
