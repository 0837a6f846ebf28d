use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Metadata for one audio file, either reused from a snapshot or freshly extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRecord {
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration_seconds: f64,
}

impl TrackRecord {
    /// Record built from the file name alone, used when extraction fails.
    pub fn fallback(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            title: base_name(path),
            artist: String::new(),
            album: String::new(),
            duration_seconds: 0.0,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration_seconds).unwrap_or(Duration::ZERO)
    }
}

/// File name including its extension, or the full path when there is none.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// A file modification time, in nanoseconds relative to the Unix epoch.
///
/// Only ever compared for equality; it is a change fingerprint, not a clock.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mtime(i64);

impl Mtime {
    /// Stored for files whose modification time could not be read.
    pub const UNKNOWN: Mtime = Mtime(i64::MIN);

    pub fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub fn as_nanos(self) -> i64 {
        self.0
    }
}

impl From<SystemTime> for Mtime {
    fn from(t: SystemTime) -> Self {
        let nanos = match t.duration_since(UNIX_EPOCH) {
            Ok(d) => i64::try_from(d.as_nanos()).unwrap_or(i64::MAX),
            Err(e) => i64::try_from(e.duration().as_nanos())
                .map(|n| -n)
                .unwrap_or(i64::MIN + 1),
        };
        Self(nanos)
    }
}

/// Path to last observed modification time.
pub type TimestampMap = BTreeMap<PathBuf, Mtime>;

/// Output of one scan; becomes the next snapshot once persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanResult {
    pub tracks: Vec<TrackRecord>,
    pub timestamps: TimestampMap,
    pub reused_count: usize,
    pub extracted_count: usize,
}

/// Progress of an in-flight scan. `current_index` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanProgress {
    pub current_index: usize,
    pub total: usize,
    pub current_path: PathBuf,
    pub reused_count: usize,
    pub extracted_count: usize,
}

/// Input of a scan: the root plus whatever the cache held for it.
#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    pub root: PathBuf,
    pub prior_tracks: Vec<TrackRecord>,
    pub prior_timestamps: TimestampMap,
}

impl ScanRequest {
    /// A request with no prior state; every file gets extracted.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_prior(mut self, tracks: Vec<TrackRecord>, timestamps: TimestampMap) -> Self {
        self.prior_tracks = tracks;
        self.prior_timestamps = timestamps;
        self
    }
}
