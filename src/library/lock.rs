use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::error::ScanError;

/// Roots with a scan in flight. A second scan of a busy root is rejected.
#[derive(Debug, Default, Clone)]
pub struct RootLocks {
    active: Arc<Mutex<HashSet<PathBuf>>>,
}

impl RootLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn active(&self) -> MutexGuard<'_, HashSet<PathBuf>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn try_acquire(&self, root: &Path) -> Result<RootGuard, ScanError> {
        if !self.active().insert(root.to_path_buf()) {
            return Err(ScanError::Busy(root.to_path_buf()));
        }
        Ok(RootGuard {
            root: root.to_path_buf(),
            active: Arc::clone(&self.active),
        })
    }

    pub fn is_busy(&self, root: &Path) -> bool {
        self.active().contains(root)
    }
}

/// Releases its root when dropped.
#[derive(Debug)]
pub struct RootGuard {
    root: PathBuf,
    active: Arc<Mutex<HashSet<PathBuf>>>,
}

impl RootGuard {
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Drop for RootGuard {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.root);
    }
}
