//! Audio library scanning.
//!
//! Walks a folder for audio files, decides per file whether the record from
//! the previous scan can be reused, extracts metadata for the rest and
//! reports throttled progress along the way.

mod detect;
mod display;
mod error;
mod extract;
mod indexer;
mod lock;
mod model;
mod progress;
mod scan;
mod walk;
mod worker;

pub use detect::{Decision, classify, needs_extraction, read_mtime};
pub use display::{display_from_fields, format_duration};
pub use error::{MetadataError, ScanError};
pub use extract::{LoftyReader, MetadataSource, RawMetadata, extract_record};
pub use indexer::{Indexer, PendingScan, normalize_root};
pub use lock::{RootGuard, RootLocks};
pub use model::*;
pub use progress::{ProgressPolicy, Throttle};
pub use scan::scan;
pub use walk::{AUDIO_EXTENSIONS, is_audio_file, walk};
pub use worker::ScanHandle;
