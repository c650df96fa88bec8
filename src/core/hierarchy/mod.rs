//! Role and hierarchy resolution
//!
//! Computes the transitive report set of a user from the directory's reporting edges.
//! Closures are memoized per request; org charts may additionally be shared across
//! requests when invalidation events are wired up.

mod cache;
mod chart;
mod resolver;

pub use cache::{HierarchyEvent, RequestScope, SharedHierarchyCache};
pub use chart::{OrgChart, closes_cycle};
pub use resolver::HierarchyResolver;
