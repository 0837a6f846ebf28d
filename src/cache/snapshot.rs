use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::library::{ScanRequest, ScanResult, TimestampMap, TrackRecord};

use super::error::CacheError;

/// Persisted outcome of the last scan of `root_path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub root_path: PathBuf,
    pub tracks: Vec<TrackRecord>,
    pub timestamps: TimestampMap,
    /// Milliseconds since the Unix epoch.
    pub captured_at: u64,
}

impl Snapshot {
    pub fn from_result(root: &Path, result: &ScanResult) -> Self {
        let captured_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);

        Self {
            root_path: root.to_path_buf(),
            tracks: result.tracks.clone(),
            timestamps: result.timestamps.clone(),
            captured_at,
        }
    }

    /// Drop tracks and timestamps whose paths are not valid UTF-8.
    ///
    /// JSON keys and strings cannot carry such paths. Dropped files have no
    /// cached timestamp and are extracted again on the next scan. Returns
    /// how many files were dropped.
    pub fn retain_encodable(&mut self) -> usize {
        let before = self.timestamps.len();
        self.tracks.retain(|t| t.path.to_str().is_some());
        self.timestamps.retain(|p, _| p.to_str().is_some());
        before - self.timestamps.len()
    }

    /// Seed the next scan of the same root with this snapshot.
    pub fn into_request(self) -> ScanRequest {
        ScanRequest::new(self.root_path).with_prior(self.tracks, self.timestamps)
    }
}

/// Key-value storage for snapshots, keyed by root path.
///
/// A miss is `Ok(None)`, never an error. `put` replaces whatever was stored.
pub trait SnapshotStore: Send + Sync {
    fn get(&self, root: &Path) -> Result<Option<Snapshot>, CacheError>;
    fn put(&self, root: &Path, snapshot: Snapshot) -> Result<(), CacheError>;
    fn delete(&self, root: &Path) -> Result<(), CacheError>;
    fn clear(&self) -> Result<(), CacheError>;
}
