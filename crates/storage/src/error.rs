//! Storage error types

use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Referenced document does not exist
    #[error("document not found: {0}")]
    NotFound(String),

    /// Unique key constraint violated on insert
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// Continuation token could not be decoded
    #[error("invalid pagination token: {0}")]
    InvalidPaginationToken(String),

    /// Document could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Backend unavailable or failed mid-operation
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// Whether this error is a missing-document report rather than a
    /// backend failure. Callers use this to decide retry policy.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }

    /// Whether this error reports a unique-key collision.
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, StorageError::DuplicateKey(_))
    }
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;
