//! Transport trait and raw response type

use crate::error::TransportError;
use async_trait::async_trait;

/// A response as received from the remote source, before any status check
/// or decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Create a response from a status code and body bytes
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A 200 response carrying the given body
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, body)
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for fetching raw resource payloads
///
/// The aggregator only ever issues GET requests for relative resource paths
/// such as `users` or `posts/1/comments`. Implementations decide how those
/// paths map to a network location, and own timeout and retry policy.
///
/// Implementations must be safe to call concurrently: a single feed fetch
/// issues two requests at once through the same transport.
///
/// # Examples
///
/// ```
/// use feed_aggregator::transport::{CannedTransport, RawResponse, Transport};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = CannedTransport::new().with_json("users", "[]");
/// let response = transport.get("users").await?;
/// assert!(response.is_success());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET request for a relative resource path
    ///
    /// Non-2xx statuses are returned as a [`RawResponse`], not as an error;
    /// the caller decides how to treat them.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no response could be obtained
    /// (connection failure, timeout, invalid URL).
    async fn get(&self, path: &str) -> Result<RawResponse, TransportError>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
