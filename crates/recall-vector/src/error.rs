//! Vector store error types.

use thiserror::Error;

/// Errors that can occur during vector store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Metadata count mismatch at build time
    #[error("Metadata count mismatch: {texts} texts, {metadatas} records")]
    CountMismatch { texts: usize, metadatas: usize },

    /// On-disk format error
    #[error("Codec error: {0}")]
    Codec(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Embedding error
    #[error("Embedding error: {0}")]
    Embedding(#[from] recall_embeddings::EmbeddingError),
}
