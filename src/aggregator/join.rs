//! Join and filter steps of the feed pipeline
//!
//! Both functions are synchronous and operate on already-fetched data.

use crate::types::{EnrichedPost, Post, User, UserId};
use std::collections::HashMap;
use tracing::debug;

/// Pair every post with its owning user
///
/// Output order and cardinality follow `posts` exactly. A post whose
/// `user_id` has no match in `users` gets `user: None`. If `users` contains
/// duplicate IDs the last one wins.
pub fn join_posts(users: Vec<User>, posts: Vec<Post>) -> Vec<EnrichedPost> {
    let by_id: HashMap<UserId, User> = users.into_iter().map(|u| (u.id, u)).collect();

    posts
        .into_iter()
        .map(|post| {
            let user = by_id.get(&post.user_id).cloned();
            if user.is_none() {
                debug!(
                    post_id = %post.id,
                    user_id = %post.user_id,
                    "Post references a user that was not fetched"
                );
            }
            EnrichedPost { post, user }
        })
        .collect()
}

/// Keep only entries whose username contains `term`, ignoring case
///
/// An empty term keeps everything, including entries without a user.
/// A non-empty term drops entries without a user.
pub fn filter_by_username(entries: Vec<EnrichedPost>, term: &str) -> Vec<EnrichedPost> {
    if term.is_empty() {
        return entries;
    }

    let needle = term.to_lowercase();
    entries
        .into_iter()
        .filter(|entry| {
            entry
                .username()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .collect()
}
