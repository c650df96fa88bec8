//! RCAI ownership lookups

mod index;

pub use index::OwnerIndex;
