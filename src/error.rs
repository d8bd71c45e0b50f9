use thiserror::Error;

use crate::element::{ElementId, PathError};

/// Failures of a durable key/value backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage quota exceeded: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Errors that can occur while writing or reading saved builder state
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize state: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Errors raised while building a command. Executing or undoing a command
/// never fails.
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Element {0} not found")]
    ElementNotFound(ElementId),

    #[error(transparent)]
    InvalidPath(#[from] PathError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
