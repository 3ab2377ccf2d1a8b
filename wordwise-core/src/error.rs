//! Error types for the wordwise core library.

use thiserror::Error;

/// Top-level error type for all wordwise operations.
///
/// Most of these never reach callers of the scheduler or the search engine:
/// those components log storage and serialization failures and fall back to
/// empty data. The variants surface from the lower-level building blocks
/// (stores, config loading, word validation).
#[derive(Error, Debug)]
pub enum WordwiseError {
    /// A word record failed validation at the vocabulary boundary.
    #[error("Invalid word: {reason}")]
    InvalidWord {
        /// Why the record was rejected.
        reason: String,
    },

    /// The store refused a write because it would exceed its byte quota.
    #[error("Storage quota exceeded: writing {key} needs {needed} bytes (quota: {quota})")]
    QuotaExceeded {
        /// Key being written.
        key: String,
        /// Total bytes the store would hold after the write.
        needed: usize,
        /// Configured byte limit.
        quota: usize,
    },

    /// A store backend failed for a reason other than quota.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// SQLite persistence error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for WordwiseError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, WordwiseError>;
