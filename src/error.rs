//! Client error types.

use thiserror::Error;

/// Errors surfaced by the sync client and controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// Transport failure, unexpected status or undecodable body
    #[error("Network error: {0}")]
    Network(String),

    /// The server has no todo with this id
    #[error("Todo not found: {0}")]
    NotFound(String),

    /// Rejected client-side, never sent
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Push channel could not be opened
    #[error("Push channel error: {0}")]
    Channel(String),
}

impl From<reqwest::Error> for TodoError {
    fn from(err: reqwest::Error) -> Self {
        TodoError::Network(err.to_string())
    }
}

/// Result type alias using TodoError.
pub type TodoResult<T> = Result<T, TodoError>;
