//! Feed fetch example
//!
//! Fetches the post feed, optionally filtered by username, then the comments
//! of the first post, and prints them the way a UI would render them.
//!
//! ```bash
//! cargo run --example fetch_feed -- [search-term]
//! FEED_API_URL=http://localhost:3000 cargo run --example fetch_feed -- bret
//! RUST_LOG=feed_aggregator=debug cargo run --example fetch_feed
//! ```

use feed_aggregator::{Aggregator, Config, Error};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut config = Config::default();
    if let Ok(url) = std::env::var("FEED_API_URL") {
        config.api.base_url = url;
    }

    let search_term = std::env::args().nth(1);
    let aggregator = Aggregator::from_config(&config)?;

    // Ctrl+C cancels whatever fetch is in flight
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    let feed = match aggregator
        .fetch_feed_with_cancel(search_term.as_deref(), &cancel)
        .await
    {
        Ok(feed) => feed,
        Err(Error::Cancelled) => {
            println!("Cancelled");
            return Ok(());
        }
        Err(e) if e.is_remote_failure() => {
            println!("Error loading posts ({}): {}", e.error_code(), e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if feed.is_empty() {
        println!("No posts found");
        return Ok(());
    }

    for entry in &feed {
        println!(
            "[{}] {} - {}",
            entry.post.id,
            entry.username().unwrap_or("<unknown user>"),
            entry.post.title
        );
    }

    let first = &feed[0];
    println!("\nComments on post {}:", first.post.id);
    match aggregator
        .fetch_comments_with_cancel(first.post.id, &cancel)
        .await
    {
        Ok(comments) if comments.is_empty() => println!("  (no comments)"),
        Ok(comments) => {
            for comment in comments {
                println!("  {} <{}>: {}", comment.name, comment.email, comment.body);
            }
        }
        Err(e) => println!("  Error loading comments: {}", e),
    }

    Ok(())
}
