//! Error types for ftsync-core.

use std::path::PathBuf;

/// Errors that can occur while declaring, loading, or synchronizing
/// search vectors.
///
/// All variants are marked `#[non_exhaustive]` so new failure modes can be
/// added without breaking callers.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A declaration references something the entity does not provide, or
    /// two declarations collide.
    #[error("Mapping error on {entity}: {message}")]
    Mapping {
        /// Entity whose metadata failed to load
        entity: String,
        /// What went wrong
        message: String,
    },

    /// A declaration watches a mapped column whose storage type is not text
    /// compatible.
    #[error(
        "{entity}::{property} search vector can only watch ( \"{allowed}\" ) columns; \
         {entity}::{field} has the type {column_type}"
    )]
    UnsupportedColumnType {
        /// Entity being loaded
        entity: String,
        /// Property receiving the search vector
        property: String,
        /// Watched field with the wrong type
        field: String,
        /// Declared storage type of the watched field
        column_type: String,
        /// Allow-list, joined with `" | "`
        allowed: String,
    },

    /// A weight letter outside `A`..`D`.
    #[error("Invalid weight '{0}': expected one of A, B, C, D")]
    InvalidWeight(String),

    /// A text-search configuration name that is not a plain identifier.
    #[error("Invalid text search configuration '{0}'")]
    InvalidLanguage(String),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error with the path that triggered it
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience `Result` type alias for ftsync-core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new mapping error for an entity.
    pub fn mapping<E, M>(entity: E, message: M) -> Self
    where
        E: Into<String>,
        M: Into<String>,
    {
        Error::Mapping {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates an I/O error tagged with the offending path.
    pub fn io_with_path(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns whether this error was raised while loading entity metadata.
    ///
    /// Mapping errors are configuration mistakes in the declarations
    /// themselves and will fail the same way on every load.
    pub fn is_mapping_error(&self) -> bool {
        match self {
            Error::Mapping { .. } => true,
            Error::UnsupportedColumnType { .. } => true,
            Error::InvalidWeight(_) => true,
            Error::InvalidLanguage(_) => true,
            Error::Config { .. } => false,
            Error::Io { .. } => false,
            Error::Toml(_) => false,
        }
    }
}
