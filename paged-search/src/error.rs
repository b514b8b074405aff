//! Error types for search execution

use thiserror::Error;

use crate::store::StoreError;

/// Result type alias using the crate [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by predicate building and paged search execution
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// The page request is malformed (page size <= 0, negative page index, ...)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A filter or ordering references a field the record store does not know
    #[error("Unknown field: {field}")]
    UnknownField {
        /// The unrecognised field name
        field: String,
    },

    /// The record store failed; passed through unchanged
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create an unknown field error
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}
