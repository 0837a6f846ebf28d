use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, info_span};

use crate::config::ScanSettings;

use super::detect::{Decision, classify, index_by_path, read_mtime};
use super::error::ScanError;
use super::extract::{MetadataSource, extract_record};
use super::model::{Mtime, ScanProgress, ScanRequest, ScanResult};
use super::progress::{ProgressPolicy, Throttle};
use super::walk::walk;

/// Run one scan of `request.root`, reusing prior records for files whose
/// modification time is unchanged.
///
/// Files are processed one at a time in enumeration order. Only a root that
/// cannot be opened (or a raised `cancel` flag) makes the scan fail; per-file
/// problems end up as forced extraction or fallback records.
pub fn scan(
    request: &ScanRequest,
    settings: &ScanSettings,
    source: &dyn MetadataSource,
    cancel: &AtomicBool,
    mut on_progress: impl FnMut(ScanProgress),
) -> Result<ScanResult, ScanError> {
    let span = info_span!("scan", root = %request.root.display());
    let _enter = span.enter();

    let files: Vec<PathBuf> = walk(&request.root, settings.follow_links)?.collect();
    let total = files.len();
    debug!(total, prior = request.prior_tracks.len(), "enumerated audio files");

    let prior_records = index_by_path(&request.prior_tracks);
    let mut throttle = Throttle::new(ProgressPolicy::from(settings));
    let mut result = ScanResult {
        tracks: Vec::with_capacity(total),
        ..ScanResult::default()
    };

    for (i, path) in files.into_iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            info!(done = i, total, "scan cancelled");
            return Err(ScanError::Cancelled);
        }

        let current = read_mtime(&path);
        if current.is_none() {
            debug!(path = %path.display(), "modification time unreadable");
        }
        result
            .timestamps
            .insert(path.clone(), current.unwrap_or(Mtime::UNKNOWN));

        let record = match classify(&path, current, &request.prior_timestamps, &prior_records) {
            Decision::Reuse(cached) => {
                result.reused_count += 1;
                cached.clone()
            }
            Decision::Extract => {
                result.extracted_count += 1;
                extract_record(source, &path)
            }
        };
        result.tracks.push(record);

        if throttle.should_emit(i, total) {
            on_progress(ScanProgress {
                current_index: i + 1,
                total,
                current_path: path,
                reused_count: result.reused_count,
                extracted_count: result.extracted_count,
            });
        }
    }

    info!(
        total,
        reused = result.reused_count,
        extracted = result.extracted_count,
        "scan finished"
    );
    Ok(result)
}
