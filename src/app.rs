//! Application module: the state a track browser keeps around a scan.
//!
//! The `App` model lives in `app::model` and holds the listed tracks, the
//! folder they came from, the latest progress and any pending notice.

mod model;

pub use model::*;
