//! Error types for the search engine adapter.
//!
//! Database failures are carried through untouched: the adapter never retries
//! and never reinterprets an error raised by PostgreSQL or the driver.

// Variant fields are described by the #[error] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Errors raised while talking to the database.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Invalid configuration values.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Errors raised by a record source while mapping results.
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// An error returned by the PostgreSQL driver, unchanged.
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    Postgres(#[from] tokio_postgres::Error),

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Errors related to configuration values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A weight label outside `A`..=`D`.
    #[error("invalid weight label '{value}', expected one of A, B, C, D")]
    InvalidWeight { value: String },

    /// A malformed connection string.
    #[error("invalid connection string: {message}")]
    InvalidConnectionString { message: String },

    /// The index does not declare its primary field, so its vector cannot be
    /// rebuilt from columns.
    #[error("index on '{table}' declares no primary field; rebuild needs the full field list")]
    MissingPrimaryField { table: String },

    /// A record's first searchable field is not the index's primary field.
    #[error("index on '{table}' expects primary field '{expected}', record starts with '{found}'")]
    PrimaryFieldMismatch {
        table: String,
        expected: String,
        found: String,
    },

    /// An environment or command line value that could not be parsed.
    #[error("invalid value '{value}' for {name}")]
    InvalidValue { name: String, value: String },
}

/// Errors raised while loading records for a result set.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The record source failed.
    #[error("record lookup failed: {message}")]
    Failed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl LookupError {
    /// Creates a lookup failure with just a message.
    pub fn failed(message: impl Into<String>) -> Self {
        LookupError::Failed {
            message: message.into(),
            source: None,
        }
    }
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(feature = "postgres")]
impl From<tokio_postgres::Error> for EngineError {
    fn from(err: tokio_postgres::Error) -> Self {
        EngineError::Backend(BackendError::Postgres(err))
    }
}

#[cfg(feature = "postgres")]
impl From<deadpool_postgres::PoolError> for EngineError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        match err {
            deadpool_postgres::PoolError::Backend(e) => {
                EngineError::Backend(BackendError::Postgres(e))
            }
            other => EngineError::Backend(BackendError::ConnectionFailed {
                backend_name: "postgres".to_string(),
                message: other.to_string(),
            }),
        }
    }
}
