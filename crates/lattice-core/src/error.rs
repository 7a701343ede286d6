//! Error types for the lattice relay.

use thiserror::Error;

/// Result type alias using lattice's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lattice relay operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Entity not found in the cohort
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Caller is not allowed to see the entity
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Entity lookup failed for a transient or unspecified reason
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Outbound channel delivery failed
    #[error("Publish error: {0}")]
    Publish(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A change notification is missing fields its kind requires
    #[error("Invalid notification: {0}")]
    InvalidNotification(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
