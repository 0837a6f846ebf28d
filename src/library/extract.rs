use std::path::Path;
use std::time::Duration;

use lofty::prelude::*;
use tracing::warn;

use super::error::MetadataError;
use super::model::{TrackRecord, base_name};

/// Whatever a metadata reader managed to find. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
}

/// The capability that reads tags and stream properties from a file.
pub trait MetadataSource: Send + Sync {
    fn read(&self, path: &Path) -> Result<RawMetadata, MetadataError>;
}

/// Reads tags with `lofty`, preferring the file's primary tag.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyReader;

impl LoftyReader {
    pub fn new() -> Self {
        Self
    }
}

fn non_blank(v: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl MetadataSource for LoftyReader {
    fn read(&self, path: &Path) -> Result<RawMetadata, MetadataError> {
        let tagged = lofty::read_from_path(path)?;

        let mut meta = RawMetadata {
            duration: Some(tagged.properties().duration()),
            ..RawMetadata::default()
        };

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            meta.title = non_blank(tag.title());
            meta.artist = non_blank(tag.artist());
            meta.album = non_blank(tag.album());
        }

        Ok(meta)
    }
}

/// Build a record for `path`. Never fails: missing fields fall back one by
/// one, and a read error yields a record derived from the file name only.
pub fn extract_record(source: &dyn MetadataSource, path: &Path) -> TrackRecord {
    match source.read(path) {
        Ok(meta) => TrackRecord {
            path: path.to_path_buf(),
            title: meta
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| base_name(path)),
            artist: meta.artist.unwrap_or_default(),
            album: meta.album.unwrap_or_default(),
            duration_seconds: meta.duration.map(|d| d.as_secs_f64()).unwrap_or(0.0),
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "metadata unreadable, using file name");
            TrackRecord::fallback(path)
        }
    }
}
