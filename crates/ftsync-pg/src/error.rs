//! Error types for ftsync-pg.

use thiserror::Error;

/// Result type alias for ftsync-pg operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ftsync-pg.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from ftsync-core
    #[error("Core error: {0}")]
    Core(#[from] ftsync_core::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed tsvector data
    #[error("tsvector codec error: {message}")]
    Codec {
        /// What was wrong with the data
        message: String,
    },
}

impl Error {
    /// Creates a new codec error.
    pub fn codec<S: Into<String>>(message: S) -> Self {
        Error::Codec {
            message: message.into(),
        }
    }
}
