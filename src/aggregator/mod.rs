//! Feed aggregation: concurrent fetch, join, and username filtering
//!
//! The [`Aggregator`] is the only component that knows how the remote
//! collections relate to each other:
//! - [`fetch_feed`](Aggregator::fetch_feed) fetches users and posts
//!   concurrently, waits for both, joins posts to their owners and applies an
//!   optional username filter
//! - [`fetch_comments`](Aggregator::fetch_comments) fetches the comments of a
//!   single post
//!
//! Nothing is cached between calls. Any transport or decode failure aborts
//! the whole call; partial feeds are never returned.

mod join;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use join::{filter_by_username, join_posts};

use crate::config::Config;
use crate::decode::decode_records;
use crate::error::{Error, Result, TransportError};
use crate::transport::{HttpTransport, Transport};
use crate::types::{Comment, EnrichedPost, Post, PostId, Resource, User};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Fetches and joins the remote user, post and comment collections
///
/// Cheap to clone; clones share the same transport.
///
/// # Examples
///
/// ```
/// use feed_aggregator::Aggregator;
/// use feed_aggregator::transport::CannedTransport;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = CannedTransport::new()
///     .with_json("users", r#"[{"id":1,"username":"Ann"},{"id":2,"username":"Bob"}]"#)
///     .with_json("posts", r#"[{"id":1,"userId":1,"title":"T1","body":"B1"},
///                             {"id":2,"userId":2,"title":"T2","body":"B2"}]"#);
/// let aggregator = Aggregator::new(Arc::new(transport));
///
/// let feed = aggregator.fetch_feed(Some("ann")).await?;
/// assert_eq!(feed.len(), 1);
/// assert_eq!(feed[0].username(), Some("Ann"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Aggregator {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("transport", &self.transport.name())
            .finish()
    }
}

impl Aggregator {
    /// Create an aggregator over an existing transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Create an aggregator backed by an [`HttpTransport`]
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// Fetch all posts joined with their owning users
    ///
    /// Users and posts are requested concurrently. Both requests must
    /// succeed; the first failure is returned immediately and the other
    /// request is dropped.
    ///
    /// When `search_term` is `Some` and non-empty, only posts whose user's
    /// username contains it (case-insensitively) are kept. Posts whose user
    /// was not fetched are kept only when no filtering applies.
    ///
    /// The result preserves the order in which the remote returned posts.
    ///
    /// # Errors
    /// Returns [`Error::Transport`] or [`Error::Decode`] if either collection
    /// could not be fetched or decoded.
    pub async fn fetch_feed(&self, search_term: Option<&str>) -> Result<Vec<EnrichedPost>> {
        let (users, posts) = tokio::try_join!(
            self.fetch_collection::<User>(Resource::Users),
            self.fetch_collection::<Post>(Resource::Posts),
        )?;

        debug!(
            users = users.len(),
            posts = posts.len(),
            "Fetched feed collections"
        );

        let joined = join_posts(users, posts);
        let feed = match search_term {
            Some(term) => filter_by_username(joined, term),
            None => joined,
        };

        debug!(
            entries = feed.len(),
            search_term = search_term.unwrap_or(""),
            "Feed assembled"
        );
        Ok(feed)
    }

    /// [`fetch_feed`](Self::fetch_feed) that stops as soon as `cancel` fires
    ///
    /// In-flight requests are dropped on cancellation.
    ///
    /// # Errors
    /// Returns [`Error::Cancelled`] if the token is cancelled before the feed
    /// is complete, otherwise the same errors as `fetch_feed`.
    pub async fn fetch_feed_with_cancel(
        &self,
        search_term: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Vec<EnrichedPost>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Feed fetch cancelled");
                Err(Error::Cancelled)
            }
            result = self.fetch_feed(search_term) => result,
        }
    }

    /// Fetch the comments of a single post, in remote order
    ///
    /// A post with no comments yields an empty vector.
    ///
    /// # Errors
    /// Returns [`Error::Transport`] for connectivity failures and non-2xx
    /// statuses, and [`Error::Decode`] for malformed payloads. Failures are
    /// never turned into an empty result.
    pub async fn fetch_comments(&self, post_id: PostId) -> Result<Vec<Comment>> {
        self.fetch_collection(Resource::Comments(post_id)).await
    }

    /// [`fetch_comments`](Self::fetch_comments) that stops as soon as
    /// `cancel` fires
    pub async fn fetch_comments_with_cancel(
        &self,
        post_id: PostId,
        cancel: &CancellationToken,
    ) -> Result<Vec<Comment>> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(%post_id, "Comment fetch cancelled");
                Err(Error::Cancelled)
            }
            result = self.fetch_comments(post_id) => result,
        }
    }

    /// Fetch one collection, check its status and decode it
    async fn fetch_collection<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>> {
        let path = resource.path();
        let response = self.transport.get(&path).await?;

        if !response.is_success() {
            return Err(TransportError::Status {
                path,
                status: response.status,
            }
            .into());
        }

        let records: Vec<T> = decode_records(resource.name(), &response.body)?;
        debug!(
            path = %path,
            transport = self.transport.name(),
            count = records.len(),
            "Fetched collection"
        );
        Ok(records)
    }
}
