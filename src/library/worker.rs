use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::error;

use crate::config::ScanSettings;

use super::error::ScanError;
use super::extract::MetadataSource;
use super::model::{ScanProgress, ScanRequest, ScanResult};
use super::scan::scan;

/// A scan running on its own thread.
///
/// Progress arrives on [`ScanHandle::progress`] and stops once the worker is
/// done; the outcome is taken exactly once with [`ScanHandle::wait`].
pub struct ScanHandle {
    progress: Receiver<ScanProgress>,
    cancel: Arc<AtomicBool>,
    join: JoinHandle<Result<ScanResult, ScanError>>,
}

impl ScanHandle {
    pub fn spawn(
        request: ScanRequest,
        settings: ScanSettings,
        source: Arc<dyn MetadataSource>,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<ScanProgress>();
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_for_worker = Arc::clone(&cancel);

        let join = thread::spawn(move || {
            scan(&request, &settings, source.as_ref(), &cancel_for_worker, |p| {
                // Nobody listening is fine.
                let _ = tx.send(p);
            })
        });

        Self {
            progress: rx,
            cancel,
            join,
        }
    }

    pub fn progress(&self) -> &Receiver<ScanProgress> {
        &self.progress
    }

    /// Ask the worker to stop before its next file.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Block until the worker finishes and return its outcome.
    pub fn wait(self) -> Result<ScanResult, ScanError> {
        self.join.join().unwrap_or_else(|_| {
            error!("scan worker panicked");
            Err(ScanError::WorkerPanicked)
        })
    }
}
