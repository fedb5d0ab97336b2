//! Error types for feed-aggregator
//!
//! The taxonomy keeps transport failures and decode failures apart so callers
//! and tests can tell them apart, while [`Error::is_remote_failure`] lets a
//! presentation layer treat both as "the fetch failed".
//! - [`TransportError`] - connectivity, timeout, bad URL, or non-2xx status
//! - [`DecodeError`] - payload did not match the expected record shape
//! - [`Error::Cancelled`] - the caller's cancellation token fired
//! - [`Error::Config`] - invalid configuration

use thiserror::Error;

/// Result type alias for feed-aggregator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for feed-aggregator
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "api.base_url")
        key: Option<String>,
    },

    /// A fetch failed before a usable payload was received
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A payload was received but could not be decoded
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The operation was cancelled by the caller
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// True for failures caused by the remote source (transport or decode)
    ///
    /// Both abort the enclosing fetch and are presented the same way to end
    /// users; cancellation and configuration errors are not remote failures.
    pub fn is_remote_failure(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Decode(_))
    }

    /// Machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Transport(e) => match e {
                TransportError::Status { .. } => "http_status",
                TransportError::Connection { .. } => "connection_failed",
                TransportError::Timeout { .. } => "timeout",
                TransportError::InvalidUrl { .. } => "invalid_url",
            },
            Error::Decode(_) => "decode_failed",
            Error::Cancelled => "cancelled",
        }
    }
}

/// Failures reported by a [`Transport`](crate::transport::Transport) or by the
/// status check applied to its responses
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status
    #[error("GET {path} returned HTTP {status}")]
    Status {
        /// The requested path
        path: String,
        /// The HTTP status code
        status: u16,
    },

    /// The request could not be sent or the response body could not be read
    #[error("request to {path} failed: {message}")]
    Connection {
        /// The requested path
        path: String,
        /// Underlying error description
        message: String,
    },

    /// The request did not complete within the transport's timeout
    #[error("request to {path} timed out")]
    Timeout {
        /// The requested path
        path: String,
    },

    /// The request URL could not be built
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl {
        /// The URL (or base URL + path) that failed to parse
        url: String,
        /// Parser error description
        reason: String,
    },
}

impl TransportError {
    /// HTTP status code, if the failure was a non-2xx response
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A payload that does not match the expected record shape
#[derive(Debug, Error)]
#[error("malformed {resource} payload: {source}")]
pub struct DecodeError {
    /// Name of the resource being decoded ("users", "posts", "comments")
    pub resource: &'static str,
    /// The underlying JSON error
    #[source]
    pub source: serde_json::Error,
}
