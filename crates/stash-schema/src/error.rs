//! Error types for schema lookups.

use thiserror::Error;

/// Errors raised when a name does not match the schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("unknown typename: {0}")]
    UnknownTypename(String),

    #[error("malformed cache id: {0}")]
    MalformedCacheId(String),

    #[error("unknown query document: {0}")]
    UnknownDocument(String),

    #[error("unknown entity family: {0}")]
    UnknownFamily(String),
}
