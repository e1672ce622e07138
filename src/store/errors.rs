//! # Store Errors
//!
//! Error types for the store adapter. Messages here are operator-facing only;
//! the REST layer never forwards them to clients.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store adapter errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database file could not be opened
    #[error("Failed to open database {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Schema creation or upgrade failed
    #[error("Schema migration failed: {0}")]
    Migration(#[source] rusqlite::Error),

    /// Statement preparation or execution failed
    #[error("Statement failed: {0}")]
    Statement(#[source] rusqlite::Error),

    /// A returned row could not be decoded into an item
    #[error("Failed to decode row: {0}")]
    Decode(#[source] rusqlite::Error),

    /// The store assigned an id outside the unsigned range
    #[error("Store returned unrepresentable row id {0}")]
    RowId(i64),

    /// Connection mutex poisoned by a panicking holder
    #[error("Store connection lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// Whether the failure happened while decoding rows rather than running SQL
    pub fn is_decode(&self) -> bool {
        matches!(self, StoreError::Decode(_))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::IntegralValueOutOfRange(..) => StoreError::Decode(err),
            other => StoreError::Statement(other),
        }
    }
}
