//! Core functionality of the access layer
//!
//! This module contains the policy logic and the data structures it reasons about.

pub mod filter;
pub mod hierarchy;
pub mod models;
pub mod overrides;
pub mod ownership;
pub mod policy;
pub mod traits;

pub use filter::{EffectiveFilter, FilterEvaluator, FilterScope, ListAuthorization};
pub use hierarchy::{HierarchyEvent, HierarchyResolver, RequestScope, SharedHierarchyCache};
pub use ownership::OwnerIndex;
pub use policy::{AccessPolicy, Decision, DenyReason, MutationAction};
