//! Boundary adapter error types.

use thiserror::Error;

use recall_index::IndexError;

/// Errors surfaced to the external task/session layer.
///
/// `IndexNotFound` is expected and recoverable; callers translate it into
/// a user-facing "no such index" response. Everything else is a generic
/// failure whose detail stays internal.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Requested index does not exist
    #[error("No such index: {0}")]
    IndexNotFound(String),

    /// Index operation failed
    #[error("Query failed: {0}")]
    Query(#[source] IndexError),

    /// Worker task failed to complete
    #[error("Worker task failed: {0}")]
    Task(String),
}

impl From<IndexError> for ToolError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::NotFound(name) => ToolError::IndexNotFound(name),
            other => ToolError::Query(other),
        }
    }
}
