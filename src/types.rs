//! Core record types fetched from the remote API and the joined feed entry

use serde::{Deserialize, Deserializer, Serialize};

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Create a new identifier
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the inner u64 value
            pub fn get(&self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl PartialEq<u64> for $name {
            fn eq(&self, other: &u64) -> bool {
                self.0 == *other
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(
    /// Unique identifier for a user
    UserId
);
id_newtype!(
    /// Unique identifier for a post
    PostId
);
id_newtype!(
    /// Unique identifier for a comment
    CommentId
);

// Text fields may be absent or explicitly null; both decode as ""
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A user account as returned by the `users` collection
///
/// Only the fields the feed needs are kept; any other fields in the payload
/// are ignored during decoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID
    pub id: UserId,

    /// Login name, matched against the feed search term
    #[serde(default, deserialize_with = "null_as_empty")]
    pub username: String,
}

/// A post as returned by the `posts` collection
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Post ID
    pub id: PostId,

    /// Owning user. May reference a user that was not fetched.
    pub user_id: UserId,

    /// Post title
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    /// Post body text
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
}

/// A comment as returned by `posts/{id}/comments`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment ID
    pub id: CommentId,

    /// The post this comment belongs to
    pub post_id: PostId,

    /// Comment subject line
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,

    /// Author email address
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,

    /// Comment text
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
}

/// A post paired with its owning user
///
/// `user` is `None` when the post references a user ID that was not present
/// in the fetched user collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedPost {
    /// The underlying post, unmodified
    pub post: Post,

    /// The owning user, if it was fetched
    pub user: Option<User>,
}

impl EnrichedPost {
    /// Username of the owning user, if known
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }
}

/// The remote collections the aggregator knows how to fetch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    /// The full `users` collection
    Users,
    /// The full `posts` collection
    Posts,
    /// Comments for a single post
    Comments(PostId),
}

impl Resource {
    /// Relative request path for this resource (no leading slash)
    pub fn path(&self) -> String {
        match self {
            Resource::Users => "users".to_string(),
            Resource::Posts => "posts".to_string(),
            Resource::Comments(post_id) => format!("posts/{post_id}/comments"),
        }
    }

    /// Short resource name used in errors and log fields
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Posts => "posts",
            Resource::Comments(_) => "comments",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}
