use super::*;
use crate::error::TransportError;
use crate::transport::CannedTransport;
use crate::types::{CommentId, UserId};
use std::time::{Duration, Instant};

const USERS: &str = r#"[{"id":1,"username":"Ann"},{"id":2,"username":"Bob"}]"#;
const POSTS: &str = r#"[
    {"id":1,"userId":1,"title":"T1","body":"B1"},
    {"id":2,"userId":2,"title":"T2","body":"B2"}
]"#;

fn aggregator(transport: CannedTransport) -> (Aggregator, Arc<CannedTransport>) {
    let transport = Arc::new(transport);
    (Aggregator::new(transport.clone()), transport)
}

fn ann_and_bob() -> CannedTransport {
    CannedTransport::new()
        .with_json("users", USERS)
        .with_json("posts", POSTS)
}

fn post_ids(feed: &[EnrichedPost]) -> Vec<u64> {
    feed.iter().map(|e| e.post.id.get()).collect()
}

// ---------------------------------------------------------------------------
// fetch_feed: join and filter
// ---------------------------------------------------------------------------

#[tokio::test]
async fn feed_without_term_pairs_every_post_with_its_user() {
    let (aggregator, _) = aggregator(ann_and_bob());

    let feed = aggregator.fetch_feed(None).await.unwrap();

    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].post.id, PostId(1));
    assert_eq!(feed[0].post.title, "T1");
    assert_eq!(feed[0].post.body, "B1");
    assert_eq!(
        feed[0].user,
        Some(User {
            id: UserId(1),
            username: "Ann".into()
        })
    );
    assert_eq!(feed[1].post.id, PostId(2));
    assert_eq!(feed[1].username(), Some("Bob"));
}

#[tokio::test]
async fn feed_term_selects_matching_user_case_insensitively() {
    let (aggregator, _) = aggregator(ann_and_bob());

    let feed = aggregator.fetch_feed(Some("ann")).await.unwrap();

    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].post.id, PostId(1));
    assert_eq!(feed[0].username(), Some("Ann"));
}

#[tokio::test]
async fn null_username_does_not_fail_feed() {
    let (aggregator, _) = aggregator(
        CannedTransport::new()
            .with_json("users", r#"[{"id":1,"username":null},{"id":2,"username":"Bob"}]"#)
            .with_json("posts", POSTS),
    );

    let feed = aggregator.fetch_feed(None).await.unwrap();
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].username(), Some(""));

    let filtered = aggregator.fetch_feed(Some("bob")).await.unwrap();
    assert_eq!(post_ids(&filtered), vec![2]);
}

#[tokio::test]
async fn feed_term_without_match_is_empty_not_error() {
    let (aggregator, _) = aggregator(ann_and_bob());

    let feed = aggregator.fetch_feed(Some("zzz")).await.unwrap();

    assert!(feed.is_empty());
}

#[tokio::test]
async fn feed_empty_term_behaves_like_no_term() {
    let (aggregator, _) = aggregator(ann_and_bob());

    let unfiltered = aggregator.fetch_feed(None).await.unwrap();
    let empty_term = aggregator.fetch_feed(Some("")).await.unwrap();

    assert_eq!(unfiltered, empty_term);
}

#[tokio::test]
async fn feed_of_empty_collections_is_empty() {
    let transport = CannedTransport::new()
        .with_json("users", "[]")
        .with_json("posts", "[]");
    let (aggregator, _) = aggregator(transport);

    assert!(aggregator.fetch_feed(Some("InvalidUser")).await.unwrap().is_empty());
    assert!(aggregator.fetch_feed(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn dangling_user_id_produces_entry_without_user() {
    let transport = CannedTransport::new()
        .with_json("users", r#"[{"id":1,"username":"Ann"}]"#)
        .with_json(
            "posts",
            r#"[{"id":1,"userId":1},{"id":2,"userId":77},{"id":3,"userId":1}]"#,
        );
    let (aggregator, _) = aggregator(transport);

    let feed = aggregator.fetch_feed(None).await.unwrap();
    assert_eq!(post_ids(&feed), vec![1, 2, 3]);
    assert!(feed[1].user.is_none());
    assert_eq!(feed[1].post.user_id, UserId(77));

    let filtered = aggregator.fetch_feed(Some("a")).await.unwrap();
    assert_eq!(post_ids(&filtered), vec![1, 3]);
}

#[tokio::test]
async fn feed_preserves_remote_post_order() {
    let transport = CannedTransport::new()
        .with_json("users", r#"[{"id":1,"username":"User1"},{"id":2,"username":"User2"}]"#)
        .with_json(
            "posts",
            r#"[{"id":9,"userId":2},{"id":3,"userId":1},{"id":5,"userId":2},{"id":1,"userId":1}]"#,
        );
    let (aggregator, _) = aggregator(transport);

    let feed = aggregator.fetch_feed(None).await.unwrap();
    assert_eq!(post_ids(&feed), vec![9, 3, 5, 1]);

    let user2 = aggregator.fetch_feed(Some("user2")).await.unwrap();
    assert_eq!(post_ids(&user2), vec![9, 5]);
}

#[tokio::test]
async fn feed_handles_large_data_set() {
    let users: Vec<User> = (1..=100)
        .map(|i| User {
            id: UserId(i),
            username: format!("User{i}"),
        })
        .collect();
    let posts: Vec<Post> = (1..=100)
        .map(|i| Post {
            id: PostId(i),
            user_id: UserId(i),
            title: String::new(),
            body: String::new(),
        })
        .collect();
    let transport = CannedTransport::new()
        .with_records("users", &users)
        .unwrap()
        .with_records("posts", &posts)
        .unwrap();
    let (aggregator, _) = aggregator(transport);

    let feed = aggregator.fetch_feed(None).await.unwrap();

    assert_eq!(feed.len(), 100);
    assert!(feed.iter().all(|e| e.user.is_some()));
    assert_eq!(feed[99].username(), Some("User100"));

    // "User1" also matches User10..User19 and User100
    let filtered = aggregator.fetch_feed(Some("user1")).await.unwrap();
    assert_eq!(filtered.len(), 12);
    assert_eq!(filtered[0].post.id, PostId(1));
    assert_eq!(filtered[11].post.id, PostId(100));
}

// ---------------------------------------------------------------------------
// fetch_feed: join barrier and failure policy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn feed_requests_both_collections_every_call() {
    let (aggregator, transport) = aggregator(ann_and_bob());

    aggregator.fetch_feed(None).await.unwrap();
    aggregator.fetch_feed(Some("bob")).await.unwrap();

    let mut requests = transport.requests();
    requests.sort();
    assert_eq!(requests, vec!["posts", "posts", "users", "users"]);
}

#[tokio::test]
async fn feed_fetches_collections_concurrently() {
    let transport = ann_and_bob()
        .with_delay("users", Duration::from_millis(300))
        .with_delay("posts", Duration::from_millis(300));
    let (aggregator, _) = aggregator(transport);

    let start = Instant::now();
    let feed = aggregator.fetch_feed(None).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(feed.len(), 2);
    assert!(
        elapsed < Duration::from_millis(550),
        "fetches ran sequentially: {elapsed:?}"
    );
}

#[tokio::test]
async fn users_failure_aborts_feed() {
    let transport = CannedTransport::new()
        .with_status("users", 500)
        .with_json("posts", POSTS);
    let (aggregator, _) = aggregator(transport);

    let err = aggregator.fetch_feed(None).await.unwrap_err();

    match err {
        Error::Transport(TransportError::Status { path, status }) => {
            assert_eq!(path, "users");
            assert_eq!(status, 500);
        }
        other => panic!("expected transport status error, got {other:?}"),
    }
}

#[tokio::test]
async fn posts_failure_aborts_feed() {
    let transport = CannedTransport::new().with_json("users", USERS).with_error(
        "posts",
        TransportError::Connection {
            path: "posts".into(),
            message: "connection reset by peer".into(),
        },
    );
    let (aggregator, _) = aggregator(transport);

    let err = aggregator.fetch_feed(None).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Transport(TransportError::Connection { .. })
    ));
    assert!(err.is_remote_failure());
}

#[tokio::test]
async fn malformed_posts_payload_is_decode_error() {
    let transport = CannedTransport::new()
        .with_json("users", USERS)
        .with_json("posts", r#"{"error":"rate limited"}"#);
    let (aggregator, _) = aggregator(transport);

    let err = aggregator.fetch_feed(None).await.unwrap_err();

    match err {
        Error::Decode(e) => assert_eq!(e.resource, "posts"),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn failure_does_not_wait_for_slow_sibling() {
    let transport = CannedTransport::new()
        .with_status("users", 503)
        .with_json("posts", POSTS)
        .with_delay("posts", Duration::from_secs(10));
    let (aggregator, _) = aggregator(transport);

    let start = Instant::now();
    let err = aggregator.fetch_feed(None).await.unwrap_err();

    assert!(start.elapsed() < Duration::from_secs(2));
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn cancelled_feed_returns_promptly() {
    let transport = ann_and_bob()
        .with_delay("users", Duration::from_secs(10))
        .with_delay("posts", Duration::from_secs(10));
    let (aggregator, _) = aggregator(transport);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let start = Instant::now();
    let err = aggregator
        .fetch_feed_with_cancel(None, &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert!(!err.is_remote_failure());
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn uncancelled_token_returns_feed() {
    let (aggregator, _) = aggregator(ann_and_bob());
    let cancel = CancellationToken::new();

    let feed = aggregator
        .fetch_feed_with_cancel(Some("BOB"), &cancel)
        .await
        .unwrap();

    assert_eq!(post_ids(&feed), vec![2]);
}

#[tokio::test]
async fn already_cancelled_token_skips_fetch_result() {
    let (aggregator, _) = aggregator(ann_and_bob());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = aggregator
        .fetch_feed_with_cancel(None, &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
}

// ---------------------------------------------------------------------------
// fetch_comments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn comments_are_returned_unmodified() {
    let transport = CannedTransport::new().with_json(
        "posts/1/comments",
        r#"[{"postId":1,"id":1,"name":"N","email":"e@x","body":"body"}]"#,
    );
    let (aggregator, transport) = aggregator(transport);

    let comments = aggregator.fetch_comments(PostId(1)).await.unwrap();

    assert_eq!(
        comments,
        vec![Comment {
            id: CommentId(1),
            post_id: PostId(1),
            name: "N".into(),
            email: "e@x".into(),
            body: "body".into(),
        }]
    );
    assert_eq!(transport.requests(), vec!["posts/1/comments"]);
}

#[tokio::test]
async fn comments_keep_remote_order_without_dedup() {
    let transport = CannedTransport::new().with_json(
        "posts/1/comments",
        r#"[{"postId":1,"id":3},{"postId":1,"id":1},{"postId":1,"id":3}]"#,
    );
    let (aggregator, _) = aggregator(transport);

    let comments = aggregator.fetch_comments(PostId(1)).await.unwrap();
    let ids: Vec<u64> = comments.iter().map(|c| c.id.get()).collect();

    assert_eq!(ids, vec![3, 1, 3]);
}

#[tokio::test]
async fn zero_comments_is_empty() {
    let transport = CannedTransport::new().with_json("posts/999/comments", "[]");
    let (aggregator, _) = aggregator(transport);

    let comments = aggregator.fetch_comments(PostId(999)).await.unwrap();

    assert!(comments.is_empty());
}

#[tokio::test]
async fn server_error_on_comments_is_transport_error_not_empty() {
    let transport = CannedTransport::new()
        .with_json("posts/999/comments", "[]")
        .with_status("posts/1/comments", 500);
    let (aggregator, _) = aggregator(transport);

    let empty = aggregator.fetch_comments(PostId(999)).await;
    let failed = aggregator.fetch_comments(PostId(1)).await;

    assert!(matches!(empty, Ok(ref c) if c.is_empty()));
    match failed {
        Err(Error::Transport(e)) => assert_eq!(e.status(), Some(500)),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_comments_is_decode_error() {
    let transport = CannedTransport::new().with_json("posts/1/comments", "not json");
    let (aggregator, _) = aggregator(transport);

    let err = aggregator.fetch_comments(PostId(1)).await.unwrap_err();

    assert!(matches!(err, Error::Decode(_)));
    assert_eq!(err.error_code(), "decode_failed");
}

#[tokio::test]
async fn comments_connection_failure_propagates() {
    let transport = CannedTransport::new().with_error(
        "comments",
        TransportError::Timeout {
            path: "posts/5/comments".into(),
        },
    );
    let (aggregator, _) = aggregator(transport);

    let err = aggregator.fetch_comments(PostId(5)).await.unwrap_err();

    assert!(matches!(err, Error::Transport(TransportError::Timeout { .. })));
}

#[tokio::test]
async fn cancelled_comment_fetch() {
    let transport = CannedTransport::new()
        .with_json("posts/1/comments", "[]")
        .with_delay("posts/1/comments", Duration::from_secs(10));
    let (aggregator, _) = aggregator(transport);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = aggregator
        .fetch_comments_with_cancel(PostId(1), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn from_config_rejects_invalid_base_url() {
    let mut config = Config::default();
    config.api.base_url = "not a url".to_string();

    let err = Aggregator::from_config(&config).unwrap_err();

    assert!(matches!(err, Error::Config { .. }));
}

#[test]
fn debug_names_transport() {
    let (aggregator, _) = aggregator(CannedTransport::new());
    assert_eq!(
        format!("{aggregator:?}"),
        r#"Aggregator { transport: "canned" }"#
    );
}
