//! Configuration data models
//!
//! This module defines all configuration structures used by the access layer.

pub mod access;
pub mod entity;
pub mod hierarchy;
pub mod logging;
pub mod policy;
pub mod storage;

// Re-export all configuration types
pub use access::*;
pub use entity::*;
pub use hierarchy::*;
pub use logging::*;
pub use policy::*;
pub use storage::*;

/// Default connection timeout in seconds
pub fn default_connection_timeout() -> u64 {
    30
}
