use std::time::Duration;

use crate::config::TrackDisplayField;

use super::model::TrackRecord;

/// Format a `Duration` as `MM:SS`.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build a display string for a track according to the provided `fields` and separator.
///
/// Empty fields are skipped; falls back to `title` when no parts were produced.
pub fn display_from_fields(track: &TrackRecord, fields: &[TrackDisplayField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        let part = match f {
            TrackDisplayField::Title => track.title.trim().to_string(),
            TrackDisplayField::Artist => track.artist.trim().to_string(),
            TrackDisplayField::Album => track.album.trim().to_string(),
            TrackDisplayField::Filename => track
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
            TrackDisplayField::Path => track.path.display().to_string(),
            TrackDisplayField::Duration => {
                if track.duration_seconds > 0.0 {
                    format_duration(track.duration())
                } else {
                    String::new()
                }
            }
        };
        if !part.is_empty() {
            parts.push(part);
        }
    }

    if parts.is_empty() {
        track.title.clone()
    } else {
        parts.join(sep)
    }
}
