//! Core data models
//!
//! This module defines the data structures the policy engine reasons about: users and
//! their reporting lines, entity records, RCAI ownership assignments, filter modes and
//! permission overrides.

pub mod filter;
pub mod ids;
pub mod overrides;
pub mod ownership;
pub mod record;
pub mod user;

// Re-export commonly used types
pub use filter::OwnershipFilter;
pub use ids::{OrganizationId, OverrideId, RecordId, UserId};
pub use overrides::{MIN_OVERRIDE_REASON_LEN, OverrideScope, PermissionOverride};
pub use ownership::{CONSULTED_VISIBILITY, OwnershipAssignment, OwnershipKind};
pub use record::{EntityRecord, EntityType};
pub use user::{Organization, ReportingEdge, User, UserRole};
