//! Error types for Saisei REST operations.
//!
//! Every failure a request can hit on its way from builder to decoded JSON
//! maps onto one variant here. Nothing is retried or reinterpreted; the
//! variant tells the caller which stage failed.

use thiserror::Error;

/// Main error type for Saisei operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The HTTP verb is not one of GET, PUT, POST or DELETE
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// The request body could not be encoded as JSON
    #[error("Error encountered encoding JSON: {0}")]
    Serialization(String),

    /// The response body is not valid JSON (or not the expected shape)
    #[error("Error encountered decoding JSON: {0}")]
    Decode(String),

    /// Connection-level failure: DNS, TLS, connect, timeout or body read
    #[error("HTTP transport error: {0}")]
    Transport(String),

    /// The server answered with a status outside the accepted set
    #[error("Bad HTTP status code: {code}")]
    HttpStatus {
        /// Status code returned by the server
        code: u16,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The request URL could not be assembled
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// A resource identifier cannot address a single item
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Specialized result type for Saisei operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidMethod(_) => "INVALID_METHOD",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::HttpStatus { .. } => "HTTP_STATUS_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
        }
    }

    /// Returns the HTTP status carried by an [`Error::HttpStatus`].
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns true if this error should be logged as a serious error.
    ///
    /// Programmer errors (bad verb, bad identifier, unencodable body) are left
    /// to the caller.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::ConfigError(_) | Self::InvalidEndpoint(_)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {err}"))
        } else if err.is_connect() {
            Self::Transport(format!("connection failed: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}
