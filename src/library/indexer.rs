use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Receiver;

use tracing::{debug, info, warn};

use crate::cache::{CacheError, Snapshot, SnapshotStore};
use crate::config::ScanSettings;

use super::error::ScanError;
use super::extract::MetadataSource;
use super::lock::{RootGuard, RootLocks};
use super::model::{ScanProgress, ScanRequest, ScanResult};
use super::worker::ScanHandle;

/// Ties the scan to the snapshot cache: read the last snapshot, scan on a
/// worker, store the new snapshot. At most one scan per root at a time.
pub struct Indexer {
    store: Option<Arc<dyn SnapshotStore>>,
    source: Arc<dyn MetadataSource>,
    locks: RootLocks,
    settings: ScanSettings,
}

/// A scan started by [`Indexer::start`]. Holds the root's lock until
/// [`PendingScan::finish`] returns or the value is dropped.
pub struct PendingScan {
    root: PathBuf,
    handle: ScanHandle,
    store: Option<Arc<dyn SnapshotStore>>,
    _guard: RootGuard,
}

/// Roots are keyed by their absolute form so `music` and `./music` agree.
pub fn normalize_root(root: &Path) -> PathBuf {
    std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf())
}

impl Indexer {
    pub fn new(
        store: Arc<dyn SnapshotStore>,
        source: Arc<dyn MetadataSource>,
        settings: ScanSettings,
    ) -> Self {
        Self {
            store: Some(store),
            source,
            locks: RootLocks::new(),
            settings,
        }
    }

    /// Every scan starts from scratch and nothing is stored.
    pub fn without_cache(source: Arc<dyn MetadataSource>, settings: ScanSettings) -> Self {
        Self {
            store: None,
            source,
            locks: RootLocks::new(),
            settings,
        }
    }

    /// Share root locks with other indexers, so a root being scanned by any
    /// of them is busy for all of them.
    pub fn with_locks(mut self, locks: RootLocks) -> Self {
        self.locks = locks;
        self
    }

    pub fn locks(&self) -> &RootLocks {
        &self.locks
    }

    fn prior_request(&self, root: &Path) -> ScanRequest {
        let Some(store) = &self.store else {
            return ScanRequest::new(root);
        };

        match store.get(root) {
            Ok(Some(snapshot)) => {
                debug!(
                    root = %root.display(),
                    tracks = snapshot.tracks.len(),
                    captured_at = snapshot.captured_at,
                    "using cached snapshot"
                );
                let mut request = snapshot.into_request();
                request.root = root.to_path_buf();
                request
            }
            Ok(None) => ScanRequest::new(root),
            Err(e) => {
                warn!(root = %root.display(), error = %e, "cache unreadable, scanning from scratch");
                ScanRequest::new(root)
            }
        }
    }

    /// Lock `root`, load its snapshot and start scanning on a worker thread.
    pub fn start(&self, root: &Path) -> Result<PendingScan, ScanError> {
        let root = normalize_root(root);
        let guard = self.locks.try_acquire(&root)?;
        let request = self.prior_request(&root);
        info!(root = %root.display(), "starting scan");

        let handle = ScanHandle::spawn(request, self.settings.clone(), Arc::clone(&self.source));
        Ok(PendingScan {
            root,
            handle,
            store: self.store.clone(),
            _guard: guard,
        })
    }

    /// Scan `root` to completion, passing each progress event to `on_progress`.
    pub fn rescan(
        &self,
        root: &Path,
        mut on_progress: impl FnMut(&ScanProgress),
    ) -> Result<ScanResult, ScanError> {
        let pending = self.start(root)?;
        for p in pending.progress() {
            on_progress(&p);
        }
        pending.finish()
    }

    /// Drop the stored snapshot of `root`.
    pub fn forget(&self, root: &Path) -> Result<(), CacheError> {
        match &self.store {
            Some(store) => store.delete(&normalize_root(root)),
            None => Ok(()),
        }
    }

    /// Drop every stored snapshot.
    pub fn clear(&self) -> Result<(), CacheError> {
        match &self.store {
            Some(store) => store.clear(),
            None => Ok(()),
        }
    }
}

impl PendingScan {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn progress(&self) -> &Receiver<ScanProgress> {
        self.handle.progress()
    }

    pub fn cancel(&self) {
        self.handle.cancel();
    }

    /// Wait for the worker and, on success, replace the root's snapshot.
    ///
    /// Failing to store the snapshot is logged but does not fail the scan.
    pub fn finish(self) -> Result<ScanResult, ScanError> {
        let result = self.handle.wait()?;

        if let Some(store) = &self.store {
            let snapshot = Snapshot::from_result(&self.root, &result);
            if let Err(e) = store.put(&self.root, snapshot) {
                warn!(root = %self.root.display(), error = %e, "failed to store snapshot");
            }
        }
        Ok(result)
    }
}
