//! Error types for the listing engine.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all listing operations.
#[derive(Error, Debug)]
pub enum ListingError {
    /// SQLite store connection or query errors
    #[error("Store error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Retrieval failure reported by a non-SQL store implementation
    #[error("Retrieval failed: {message}")]
    Retrieval { message: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ListingError {
    /// Creates a new store error with additional context.
    pub fn database_error(message: &str, source: rusqlite::Error) -> Self {
        Self::Database {
            message: message.to_string(),
            source,
        }
    }

    /// Creates a generic retrieval failure with a message.
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval {
            message: message.into(),
        }
    }
}

/// Extension trait for mapping SQLite Results into [`ListingError`] with
/// context.
pub trait StoreResultExt<T> {
    /// Map store errors with a message.
    fn store_context(self, message: &str) -> Result<T>;
}

impl<T> StoreResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn store_context(self, message: &str) -> Result<T> {
        self.map_err(|e| ListingError::database_error(message, e))
    }
}

/// Result type alias for listing operations
pub type Result<T> = std::result::Result<T, ListingError>;
