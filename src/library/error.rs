use std::path::PathBuf;

use thiserror::Error;

/// Scan-level failures. Everything that goes wrong with a single file is
/// absorbed into the returned data instead.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot read folder {}: {source}", root.display())]
    RootUnreadable {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("a scan of {} is already running", .0.display())]
    Busy(PathBuf),

    #[error("scan cancelled")]
    Cancelled,

    #[error("scan worker panicked")]
    WorkerPanicked,
}

/// Failure of the metadata capability for one file.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error(transparent)]
    Lofty(#[from] lofty::error::LoftyError),

    #[error("unreadable file: {0}")]
    Unreadable(String),
}
