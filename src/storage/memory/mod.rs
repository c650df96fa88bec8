//! In-memory storage backend
//!
//! Lock-sharded maps implementing every collaborator trait. Used by tests, benchmarks
//! and the `access-check` tool, and loadable from a YAML [`Snapshot`].

mod directory;
mod executor;
mod ownership;
mod snapshot;

pub use directory::InMemoryDirectory;
pub use executor::InMemoryQueryExecutor;
pub use ownership::InMemoryOwnershipStore;
pub use snapshot::{InMemoryBackend, Snapshot, SnapshotAssignment};
