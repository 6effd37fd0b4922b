//! Error types for the store boundary, inbound validation and export.

use thiserror::Error;

/// Failures talking to a chunk record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("chunk '{chunk_id}' was modified concurrently")]
    Conflict { chunk_id: String },
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("corrupt chunk record: {0}")]
    Corrupt(String),
}

/// A star rating outside 1..=3 arrived from the calling application.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
    #[error("star rating must be 1, 2 or 3 (got {0})")]
    OutOfRange(u8),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}
