use std::path::PathBuf;

use thiserror::Error;

/// Input rejected before any database access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    EmptyField(&'static str),
    #[error("limit must be greater than zero")]
    ZeroLimit,
    #[error("since_days_ago must be between 0 and 30, got {0}")]
    SinceDaysOutOfRange(i64),
}

/// Failure talking to the database or reading its results.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open database at {}: {source}", path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("statement failed: {0}")]
    Execute(#[from] rusqlite::Error),
    #[error("cannot map column {column}: {reason}")]
    Mapping { column: &'static str, reason: String },
    #[error("message not found: {0}")]
    NotFound(String),
}

/// Missing or malformed startup configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Error returned by every store operation.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Store(StoreError::Execute(e))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
