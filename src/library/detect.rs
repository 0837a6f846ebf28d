use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::model::{Mtime, TimestampMap, TrackRecord};

/// What to do with one discovered file.
#[derive(Debug, PartialEq)]
pub enum Decision<'a> {
    Reuse(&'a TrackRecord),
    Extract,
}

/// Current modification time of `path`, or `None` if it cannot be read.
pub fn read_mtime(path: &Path) -> Option<Mtime> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(Mtime::from)
}

/// True unless `prior` holds exactly the `current` time for `path`.
///
/// Any difference counts, including a clock that went backwards, and an
/// unreadable time always needs extraction.
pub fn needs_extraction(path: &Path, current: Option<Mtime>, prior: &TimestampMap) -> bool {
    match (current, prior.get(path)) {
        (Some(now), Some(&cached)) => now != cached,
        _ => true,
    }
}

/// Reuse requires both an unchanged timestamp and a cached record.
pub fn classify<'a>(
    path: &Path,
    current: Option<Mtime>,
    prior_timestamps: &TimestampMap,
    prior_records: &HashMap<&'a Path, &'a TrackRecord>,
) -> Decision<'a> {
    if needs_extraction(path, current, prior_timestamps) {
        return Decision::Extract;
    }
    match prior_records.get(path) {
        Some(&record) => Decision::Reuse(record),
        None => Decision::Extract,
    }
}

/// Index prior records by path. On duplicates the last one wins.
pub fn index_by_path(records: &[TrackRecord]) -> HashMap<&Path, &TrackRecord> {
    records.iter().map(|r| (r.path.as_path(), r)).collect()
}
