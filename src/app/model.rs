//! Application model types: `App` and `ScanState`.
//!
//! A failed scan never touches the listed tracks; it only raises a notice
//! the user can dismiss.

use std::path::{Path, PathBuf};

use crate::config::DisplaySettings;
use crate::library::{ScanError, ScanProgress, ScanResult, TrackRecord, display_from_fields};

/// Where the browser is in the scan lifecycle.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ScanState {
    #[default]
    Idle,
    Scanning {
        dir: PathBuf,
        progress: Option<ScanProgress>,
    },
}

/// One listed track with its precomputed display text.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub track: TrackRecord,
    pub display: String,
}

/// The main application model.
pub struct App {
    pub entries: Vec<Entry>,
    pub current_dir: Option<PathBuf>,
    pub scan: ScanState,
    pub notice: Option<String>,
    /// Reused/extracted counts of the last successful scan.
    pub last_counts: Option<(usize, usize)>,
    display: DisplaySettings,
}

impl App {
    pub fn new(display: DisplaySettings) -> Self {
        Self {
            entries: Vec::new(),
            current_dir: None,
            scan: ScanState::Idle,
            notice: None,
            last_counts: None,
            display,
        }
    }

    pub fn has_tracks(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn is_scanning(&self) -> bool {
        matches!(self.scan, ScanState::Scanning { .. })
    }

    pub fn begin_scan(&mut self, dir: &Path) {
        self.scan = ScanState::Scanning {
            dir: dir.to_path_buf(),
            progress: None,
        };
    }

    /// Record the latest progress event. Ignored when no scan is running.
    pub fn apply_progress(&mut self, p: ScanProgress) {
        if let ScanState::Scanning { progress, .. } = &mut self.scan {
            *progress = Some(p);
        }
    }

    /// Apply a scan's outcome.
    ///
    /// Success replaces the list (sorted by display text, case-insensitive)
    /// and moves to the scanned folder. Failure keeps the current list and
    /// folder and sets a notice.
    pub fn finish_scan(&mut self, outcome: Result<ScanResult, ScanError>) {
        let dir = match std::mem::take(&mut self.scan) {
            ScanState::Scanning { dir, .. } => Some(dir),
            ScanState::Idle => None,
        };

        match outcome {
            Ok(result) => {
                self.last_counts = Some((result.reused_count, result.extracted_count));
                self.set_tracks(result.tracks);
                if dir.is_some() {
                    self.current_dir = dir;
                }
                self.notice = None;
            }
            Err(e) => {
                self.notice = Some(format!("Scan failed: {e}"));
            }
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    fn set_tracks(&mut self, tracks: Vec<TrackRecord>) {
        let mut entries: Vec<Entry> = tracks
            .into_iter()
            .map(|track| Entry {
                display: display_from_fields(&track, &self.display.fields, &self.display.separator),
                track,
            })
            .collect();
        entries.sort_by_cached_key(|e| e.display.to_lowercase());
        self.entries = entries;
    }
}
