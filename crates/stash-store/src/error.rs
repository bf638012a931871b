//! Store error types.

use stash_schema::SchemaError;
use thiserror::Error;

/// Result type for fallible store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from store operations.
///
/// Reads, writes and evictions never fail; only loading external data can.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("snapshot decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("object {id} has __typename {found:?}, expected {expected}")]
    TypenameMismatch {
        id: String,
        expected: String,
        found: Option<String>,
    },
}
