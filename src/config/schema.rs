use std::path::PathBuf;

use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/choralith/config.toml` or `~/.config/choralith/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CHORALITH__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scan: ScanSettings,
    pub cache: CacheSettings,
    pub display: DisplaySettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// How progress events are throttled.
    pub progress: ProgressMode,
    /// With `progress = "stride"`: report every Nth file.
    pub progress_stride: usize,
    /// With `progress = "interval"`: report at most once per this many milliseconds.
    pub progress_interval_ms: u64,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            follow_links: false,
            progress: ProgressMode::Stride,
            progress_stride: 5,
            progress_interval_ms: 250,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressMode {
    #[serde(alias = "every-nth")]
    Stride,
    #[serde(alias = "time")]
    Interval,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Whether to read and store snapshots at all.
    pub enabled: bool,
    /// Snapshot file. Defaults to `$XDG_CACHE_HOME/choralith/snapshots.json`.
    pub path: Option<PathBuf>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackDisplayField {
    Title,
    Artist,
    Album,
    Filename,
    Path,
    Duration,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Which fields make up a listed track, and in what order.
    ///
    /// Example: ["artist", "title"] -> "Artist - Title"
    pub fields: Vec<TrackDisplayField>,
    /// Separator used to join `fields`.
    pub separator: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            fields: vec![TrackDisplayField::Artist, TrackDisplayField::Title],
            separator: " - ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing` filter directive; `RUST_LOG` wins when set.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}
