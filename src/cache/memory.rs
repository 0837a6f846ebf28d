use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::error::CacheError;
use super::snapshot::{Snapshot, SnapshotStore};

/// Process-local store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<PathBuf, Snapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<PathBuf, Snapshot>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, root: &Path) -> Result<Option<Snapshot>, CacheError> {
        Ok(self.entries().get(root).cloned())
    }

    fn put(&self, root: &Path, snapshot: Snapshot) -> Result<(), CacheError> {
        self.entries().insert(root.to_path_buf(), snapshot);
        Ok(())
    }

    fn delete(&self, root: &Path) -> Result<(), CacheError> {
        self.entries().remove(root);
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.entries().clear();
        Ok(())
    }
}
