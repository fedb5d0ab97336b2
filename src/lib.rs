//! # feed-aggregator
//!
//! Fetches users, posts and per-post comments from a JSON API, joins posts to
//! their owners and filters the result by username.
//!
//! ## Design
//!
//! - **Join barrier** - users and posts are fetched concurrently and both
//!   must succeed before the join runs; a failure on either side aborts the
//!   call without a partial result
//! - **Soft inconsistencies** - a post whose owner was not fetched is kept
//!   with `user: None` instead of failing the feed
//! - **Injectable transport** - the [`Aggregator`] talks to a
//!   [`Transport`](transport::Transport) trait object, so tests can replace
//!   the network with [`CannedTransport`](transport::CannedTransport)
//! - **Library-first** - no CLI or UI; callers map [`Error`] to whatever
//!   presentation state they use
//!
//! ## Quick Start
//!
//! ```no_run
//! use feed_aggregator::{Aggregator, Config, PostId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let aggregator = Aggregator::from_config(&Config::default())?;
//!
//!     for entry in aggregator.fetch_feed(Some("bret")).await? {
//!         println!(
//!             "#{} {} by {}",
//!             entry.post.id,
//!             entry.post.title,
//!             entry.username().unwrap_or("<unknown>")
//!         );
//!     }
//!
//!     let comments = aggregator.fetch_comments(PostId::new(1)).await?;
//!     println!("{} comments on post 1", comments.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Feed aggregation (concurrent fetch, join, filter)
pub mod aggregator;
/// Configuration types
pub mod config;
/// Payload decoding
pub mod decode;
/// Error types
pub mod error;
/// Retry logic with exponential backoff
pub mod retry;
/// Transport abstraction and implementations
pub mod transport;
/// Core record types
pub mod types;

// Re-export commonly used types
pub use aggregator::Aggregator;
pub use config::{ApiConfig, Config, RetryConfig};
pub use error::{DecodeError, Error, Result, TransportError};
pub use transport::{CannedTransport, HttpTransport, RawResponse, Transport};
pub use types::{Comment, CommentId, EnrichedPost, Post, PostId, Resource, User, UserId};
