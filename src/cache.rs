//! Snapshot cache: the result of the last scan of each root.
//!
//! The scan only ever reads a snapshot before it starts and the indexer
//! writes a whole new one after it ends; snapshots are never merged.

mod error;
mod json;
mod memory;
mod snapshot;

pub use error::CacheError;
pub use json::JsonStore;
pub use memory::MemoryStore;
pub use snapshot::{Snapshot, SnapshotStore};

#[cfg(test)]
mod tests;
