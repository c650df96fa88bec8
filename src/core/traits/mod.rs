//! Core traits module
//!
//! Collaborator interfaces the policy engine reads through. The engine never opens a
//! connection itself: identity and org-chart data come from a [`DirectoryStore`], RCAI
//! rows from an [`OwnershipStore`], and filtered record sets from a [`QueryExecutor`].
//! All three are read-only from the engine's point of view.

pub mod directory;
pub mod executor;
pub mod ownership;

pub use directory::*;
pub use executor::*;
pub use ownership::*;
