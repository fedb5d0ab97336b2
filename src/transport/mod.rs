//! Transport layer for fetching raw resource payloads
//!
//! The aggregator depends only on the [`Transport`] trait, so the network can
//! be swapped for a deterministic double in tests. Two implementations are
//! provided:
//!
//! - [`HttpTransport`]: reqwest-based client with timeout and retry policy
//! - [`CannedTransport`]: in-memory replies keyed by path substring
//!
//! ## Usage
//!
//! ```no_run
//! use feed_aggregator::transport::{HttpTransport, Transport};
//! use feed_aggregator::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = HttpTransport::from_config(&Config::default())?;
//!     let response = transport.get("posts/1/comments").await?;
//!     println!("{} -> HTTP {}", transport.name(), response.status);
//!     Ok(())
//! }
//! ```

mod canned;
mod http;
mod traits;

pub use canned::CannedTransport;
pub use http::HttpTransport;
pub use traits::{RawResponse, Transport};
