use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported session file version: {0}")]
    UnsupportedVersion(u32),

    #[error("failed to persist session file {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}
