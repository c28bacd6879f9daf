//! Error types for the store's persistence boundary.

use thiserror::Error;

/// Result type for store persistence operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while reading or writing persisted state.
///
/// Store operations themselves never fail; these only surface from storage
/// adapters and snapshot decoding, and the store logs and absorbs them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a storage backend failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted value was not valid JSON of the expected shape.
    #[error("malformed snapshot value: {0}")]
    Json(#[from] serde_json::Error),

    /// A persisted value was not a JSON array.
    #[error("expected a JSON array under '{0}'")]
    NotAnArray(String),
}
