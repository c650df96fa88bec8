//! Policy composition layer
//!
//! [`AccessPolicy`] composes hierarchy resolution, the owner index and the filter
//! evaluator into the two operations request handlers call: list authorization and
//! mutation authorization.

mod composition;
mod types;

pub use composition::AccessPolicy;
pub use types::{Decision, DenyReason, ListQueryResult, MutationAction};
