//! Error types for the agent-recall system.

use thiserror::Error;

/// Unified error type for shared-type operations.
#[derive(Debug, Error)]
pub enum RecallError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
