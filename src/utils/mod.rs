//! Utility modules for the access engine
//!
//! - **error**: The crate-wide error type and result alias
//! - **logging**: Subscriber installation and the decision audit trail

pub mod error; // Error handling
pub mod logging; // Logging & audit

pub use error::{AccessError, Result};
pub use logging::{AuditLogger, init_logging};
