use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::error::ScanError;

/// Extensions treated as audio, lowercase and without the dot.
pub const AUDIO_EXTENSIONS: [&str; 4] = ["mp3", "wav", "ogg", "flac"];

pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            AUDIO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Lazily enumerate the audio files under `root`.
///
/// Only the root itself has to be readable. Entries that fail mid-walk (an
/// unreadable subdirectory, a dangling link) are skipped along with their
/// subtree.
pub fn walk(
    root: &Path,
    follow_links: bool,
) -> Result<impl Iterator<Item = PathBuf> + use<>, ScanError> {
    fs::read_dir(root).map_err(|source| ScanError::RootUnreadable {
        root: root.to_path_buf(),
        source,
    })?;

    let files = WalkDir::new(root)
        .follow_links(follow_links)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                debug!(
                    path = ?err.path(),
                    error = %err,
                    "skipping unreadable entry"
                );
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|p| is_audio_file(p));

    Ok(files)
}
