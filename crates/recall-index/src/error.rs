//! Index manager error types.

use thiserror::Error;

/// Errors that can occur during index management.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Requested name has no vector-structure file
    #[error("Index not found: {0}")]
    NotFound(String),

    /// Vector store error
    #[error("Store error: {0}")]
    Store(#[from] recall_vector::StoreError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
