use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed cache file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot replace cache file: {0}")]
    Persist(#[from] tempfile::PersistError),
}
