//! Error types for inkcal.

use thiserror::Error;

/// Errors that can occur while loading, collecting or saving configuration.
#[derive(Error, Debug)]
pub enum InkCalError {
    #[error("Config parse error: {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("No calendars available to select from")]
    NoCalendars,
}

/// Result type alias for inkcal operations.
pub type InkCalResult<T> = Result<T, InkCalError>;
