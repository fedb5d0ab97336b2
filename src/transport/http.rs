//! HTTP transport backed by reqwest

use super::traits::{RawResponse, Transport};
use crate::config::{ApiConfig, Config, RetryConfig};
use crate::error::{Error, Result, TransportError};
use crate::retry::{IsRetryable, with_retry};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

/// HTTP transport that resolves resource paths against a base URL
///
/// Owns the request timeout, User-Agent and retry policy. Transient failures
/// (connection errors, timeouts, 502/503/504) are retried according to the
/// [`RetryConfig`]; everything else is returned on the first attempt.
///
/// # Examples
///
/// ```no_run
/// use feed_aggregator::config::Config;
/// use feed_aggregator::transport::{HttpTransport, Transport};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = HttpTransport::from_config(&Config::default())?;
/// let response = transport.get("users").await?;
/// println!("HTTP {} ({} bytes)", response.status, response.body.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    retry: RetryConfig,
}

impl HttpTransport {
    /// Create a transport from API settings and a retry policy
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the base URL does not parse or the HTTP
    /// client cannot be created.
    pub fn new(api: &ApiConfig, retry: RetryConfig) -> Result<Self> {
        let mut base_url = Url::parse(&api.base_url).map_err(|e| Error::Config {
            message: format!("invalid base URL '{}': {}", api.base_url, e),
            key: Some("api.base_url".to_string()),
        })?;

        // Without a trailing slash Url::join would replace the last segment
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(api.timeout)
            .user_agent(api.user_agent.as_str())
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {}", e),
                key: None,
            })?;

        Ok(Self {
            client,
            base_url,
            retry,
        })
    }

    /// Validate a full configuration and build a transport from it
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Self::new(&config.api, config.retry.clone())
    }

    /// The normalized base URL (always ends with `/`)
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a relative resource path against the base URL
    pub fn url_for(&self, path: &str) -> std::result::Result<Url, TransportError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
                reason: e.to_string(),
            })
    }

    async fn get_once(
        &self,
        url: &Url,
        path: &str,
    ) -> std::result::Result<RawResponse, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify(path, e))?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| classify(path, e))?;

        debug!(path, status, bytes = body.len(), "HTTP response received");

        let raw = RawResponse::new(status, body.to_vec());

        // Surface retryable statuses as errors so the retry loop sees them
        if !raw.is_success() {
            let err = TransportError::Status {
                path: path.to_string(),
                status,
            };
            if err.is_retryable() {
                return Err(err);
            }
        }

        Ok(raw)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> std::result::Result<RawResponse, TransportError> {
        let url = self.url_for(path)?;
        with_retry(&self.retry, || self.get_once(&url, path)).await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

fn classify(path: &str, error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            path: path.to_string(),
        }
    } else {
        TransportError::Connection {
            path: path.to_string(),
            message: error.to_string(),
        }
    }
}
