//! The real Reddit and Supabase clients behind the ingest seams, against a
//! local mock server: wire comment trees in, queue rows out.

use std::sync::Arc;

use reddit_client::{RedditClient, RedditCredentials};
use reddit_ingest::testing::{post, RecordingQueue};
use reddit_ingest::{ContentItem, Ingestor, IngestionQueue, Poller, PollerConfig};
use serde_json::{json, Value};
use supabase_client::SupabaseClient;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn reddit_for(server: &MockServer) -> RedditClient {
    RedditClient::new(RedditCredentials {
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        user_agent: "reddit-ingest/test".to_string(),
    })
    .with_endpoints(&server.uri(), &server.uri())
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-123",
            "token_type": "bearer",
            "expires_in": 86400
        })))
        .mount(server)
        .await;
}

fn link_json() -> Value {
    json!({
        "kind": "t3",
        "data": {
            "id": "abc", "name": "t3_abc", "title": "Hi",
            "selftext": "hello world",
            "url": "https://www.reddit.com/r/startups/comments/abc/hi/",
            "permalink": "/r/startups/comments/abc/hi/",
            "created_utc": 1700000000.0
        }
    })
}

/// c1 (t+10) with replies [c2 (t+30.5), more], then c3 (t+20).
async fn mount_comments(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/comments/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"kind": "Listing", "data": {"after": null, "before": null, "children": [link_json()]}},
            {"kind": "Listing", "data": {"after": null, "before": null, "children": [
                {"kind": "t1", "data": {
                    "id": "c1", "name": "t1_c1", "body": "first",
                    "created_utc": 1700000010.0,
                    "replies": {"kind": "Listing", "data": {"after": null, "before": null, "children": [
                        {"kind": "t1", "data": {
                            "id": "c2", "name": "t1_c2", "body": "nested",
                            "created_utc": 1700000030.5, "replies": ""
                        }},
                        {"kind": "more", "data": {"id": "m1", "count": 40, "children": ["c8", "c9"]}}
                    ]}}
                }},
                {"kind": "t1", "data": {
                    "id": "c3", "name": "t1_c3", "body": "second",
                    "created_utc": 1700000020.0, "replies": ""
                }}
            ]}}
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn reddit_comment_tree_feeds_ingestor() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_comments(&server).await;

    let queue = Arc::new(RecordingQueue::new());
    let ingestor = Ingestor::new(Arc::new(reddit_for(&server)), queue.clone());

    ingestor.ingest(&post("abc", "Hi", "hello world", 0)).await.unwrap();

    // Placeholder dropped, comments newest first regardless of nesting.
    assert_eq!(queue.attempted_ids(), vec!["abc", "c2", "c3", "c1"]);
    let nested = queue
        .items()
        .into_iter()
        .find(|i| i.external_id == "c2")
        .unwrap();
    assert_eq!(nested.body, "nested");
    assert_eq!(nested.posted_at.timestamp_millis(), 1_700_000_030_500);
}

#[tokio::test]
async fn supabase_queue_posts_content_item_row() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/ingestion_queue"))
        .and(header("apikey", "service-key"))
        .and(body_json(json!({
            "source": "https://www.reddit.com/r/test/comments/p1/",
            "external_id": "p1",
            "body": "Announcement",
            "posted_at": "2023-11-14T22:13:20Z",
            "processed": false
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let queue = SupabaseClient::new(&server.uri(), "service-key".to_string());
    let item = ContentItem::from_post(&post("p1", "Announcement", "", 0));
    queue.enqueue(&item).await.unwrap();
}

#[tokio::test]
async fn full_cycle_from_listing_to_queue_rows() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_comments(&server).await;

    Mock::given(method("GET"))
        .and(path("/r/startups/new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "Listing",
            "data": {"after": null, "before": null, "children": [link_json()]}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/ingestion_queue"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let poller = Poller::new(
        Arc::new(reddit_for(&server)),
        Arc::new(SupabaseClient::new(&server.uri(), "service-key".to_string())),
        vec!["r/startups".to_string()],
        PollerConfig::default(),
    );
    let stats = poller.run_cycle().await;
    assert_eq!(stats.posts, 1);
    assert_eq!(stats.posts_failed, 0);

    let rows: Vec<Value> = server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == "/rest/v1/ingestion_queue")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();

    let ids: Vec<&str> = rows.iter().map(|r| r["external_id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["abc", "c2", "c3", "c1"]);
    assert_eq!(rows[0]["body"], "hello world");
    assert!(rows
        .iter()
        .all(|r| r["source"] == "https://www.reddit.com/r/startups/comments/abc/hi/"
            && r["processed"] == false));
}
