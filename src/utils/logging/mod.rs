//! Logging utilities
//!
//! Subscriber installation and the structured decision audit trail.

pub mod audit;
pub mod init;

pub use audit::{AUDIT_TARGET, AuditLogger};
pub use init::init_logging;
