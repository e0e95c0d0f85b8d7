//! Common error types for the persons service

use thiserror::Error;

/// Common result type for persons operations
pub type Result<T> = std::result::Result<T, Error>;

/// Domain errors shared by the store and the orchestrator
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True when the error means "record absent" rather than "operation broke"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
