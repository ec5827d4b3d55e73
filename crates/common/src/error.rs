//! Error types for quotecheck

use thiserror::Error;

/// Result type alias using the quotecheck common Error
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A rule fact was logged with a key outside the closed vocabulary.
    #[error("Unknown rule fact key: {0}")]
    UnknownFactKey(String),

    #[error("Unknown page: {0}")]
    UnknownPage(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
