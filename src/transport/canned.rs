//! Deterministic in-memory transport for tests and offline callers

use super::traits::{RawResponse, Transport};
use crate::error::TransportError;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Reply {
    Response(RawResponse),
    Fail(TransportError),
}

#[derive(Debug, Clone)]
struct Route {
    pattern: String,
    reply: Reply,
    delay: Option<Duration>,
}

/// In-memory transport answering from canned replies
///
/// Each route is keyed by a path substring. When several patterns occur in a
/// requested path the longest one wins, so `posts/1/comments` takes
/// precedence over `posts` regardless of registration order. Re-registering
/// an identical pattern replaces the earlier route. Unmatched paths answer
/// with an empty 404.
///
/// Every requested path is recorded and can be inspected with
/// [`requests`](Self::requests).
///
/// # Examples
///
/// ```
/// use feed_aggregator::transport::{CannedTransport, Transport};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = CannedTransport::new()
///     .with_json("posts", r#"[{"id":1,"userId":1}]"#)
///     .with_status("posts/1/comments", 500);
///
/// assert_eq!(transport.get("posts").await?.status, 200);
/// assert_eq!(transport.get("posts/1/comments").await?.status, 500);
/// assert_eq!(transport.requests(), vec!["posts", "posts/1/comments"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct CannedTransport {
    routes: Vec<Route>,
    requests: Mutex<Vec<String>>,
}

impl CannedTransport {
    /// Create a transport with no routes
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer paths containing `pattern` with the given response
    pub fn with_response(self, pattern: impl Into<String>, response: RawResponse) -> Self {
        self.with_reply(pattern.into(), Reply::Response(response))
    }

    /// Answer paths containing `pattern` with a 200 and the given JSON body
    pub fn with_json(self, pattern: impl Into<String>, body: impl Into<String>) -> Self {
        self.with_response(pattern, RawResponse::ok(body.into()))
    }

    /// Answer paths containing `pattern` with a 200 and `value` serialized as JSON
    pub fn with_records<T: serde::Serialize>(
        self,
        pattern: impl Into<String>,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        Ok(self.with_response(pattern, RawResponse::ok(body)))
    }

    /// Answer paths containing `pattern` with an empty body and the given status
    pub fn with_status(self, pattern: impl Into<String>, status: u16) -> Self {
        self.with_response(pattern, RawResponse::new(status, Vec::new()))
    }

    /// Fail requests for paths containing `pattern` with a transport error
    pub fn with_error(self, pattern: impl Into<String>, error: TransportError) -> Self {
        self.with_reply(pattern.into(), Reply::Fail(error))
    }

    /// Delay replies for `pattern`
    ///
    /// # Panics
    /// Panics if no route was registered for `pattern`.
    pub fn with_delay(mut self, pattern: &str, delay: Duration) -> Self {
        match self.routes.iter_mut().find(|r| r.pattern == pattern) {
            Some(route) => route.delay = Some(delay),
            None => panic!("with_delay: no route registered for pattern '{pattern}'"),
        }
        self
    }

    /// Paths requested so far, in request order
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn with_reply(mut self, pattern: String, reply: Reply) -> Self {
        self.routes.retain(|r| r.pattern != pattern);
        self.routes.push(Route {
            pattern,
            reply,
            delay: None,
        });
        self
    }

    fn route_for(&self, path: &str) -> Option<&Route> {
        self.routes
            .iter()
            .filter(|r| path.contains(r.pattern.as_str()))
            .max_by_key(|r| r.pattern.len())
    }

    fn record(&self, path: &str) {
        let mut requests = match self.requests.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        requests.push(path.to_string());
    }
}

#[async_trait]
impl Transport for CannedTransport {
    async fn get(&self, path: &str) -> Result<RawResponse, TransportError> {
        self.record(path);

        let Some(route) = self.route_for(path) else {
            return Ok(RawResponse::new(404, Vec::new()));
        };

        if let Some(delay) = route.delay {
            tokio::time::sleep(delay).await;
        }

        match &route.reply {
            Reply::Response(response) => Ok(response.clone()),
            Reply::Fail(error) => Err(error.clone()),
        }
    }

    fn name(&self) -> &'static str {
        "canned"
    }
}
