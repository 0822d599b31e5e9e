//! Unified error types for the flag service.

use thiserror::Error;

/// Unified error type for the flag service.
#[derive(Error, Debug)]
pub enum FlagError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Parameter store error.
    #[error("parameter store error: {0}")]
    Store(#[from] StoreError),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parameter store fetch errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store returned a non-success HTTP status.
    #[error("parameter {name} fetch failed: HTTP {status}")]
    BadStatus {
        /// The parameter that was requested.
        name: String,
        /// HTTP status code returned by the store.
        status: u16,
    },

    /// The response did not carry a value for the parameter.
    #[error("parameter {name} has no value")]
    MissingValue {
        /// The parameter that was requested.
        name: String,
    },

    /// Failed to parse the store response.
    #[error("failed to parse store response: {0}")]
    ParseError(String),

    /// HTTP request failed.
    #[error("http request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, FlagError>;
