use chrono::{DateTime, Utc};
use serde::Serialize;

/// A discovered submission, independent of the source API's wire shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    pub url: String,
    pub title: String,
    /// Empty for link posts.
    pub selftext: String,
    pub created_at: DateTime<Utc>,
}

/// One node of a post's comment tree as returned by the source.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentNode {
    Comment(Comment),
    /// "load more" stub standing in for a truncated subtree.
    More { count: u64, children: Vec<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub replies: Vec<CommentNode>,
}

/// A row in the ingestion queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentItem {
    /// Permalink/URL of the post the content belongs to.
    pub source: String,
    pub external_id: String,
    pub body: String,
    pub posted_at: DateTime<Utc>,
    pub processed: bool,
}

impl ContentItem {
    /// Post-level item. Self-text wins; link posts fall back to the title.
    pub fn from_post(post: &Post) -> Self {
        let body = if post.selftext.is_empty() {
            post.title.clone()
        } else {
            post.selftext.clone()
        };
        Self {
            source: post.url.clone(),
            external_id: post.id.clone(),
            body,
            posted_at: post.created_at,
            processed: false,
        }
    }

    pub fn from_comment(post: &Post, comment: &Comment) -> Self {
        Self {
            source: post.url.clone(),
            external_id: comment.id.clone(),
            body: comment.body.clone(),
            posted_at: comment.created_at,
            processed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post(selftext: &str, title: &str) -> Post {
        Post {
            id: "p1".to_string(),
            url: "https://www.reddit.com/r/startups/comments/p1/x/".to_string(),
            title: title.to_string(),
            selftext: selftext.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn post_item_prefers_selftext() {
        let item = ContentItem::from_post(&post("hello world", "Hi"));
        assert_eq!(item.body, "hello world");
        assert_eq!(item.external_id, "p1");
        assert!(!item.processed);
    }

    #[test]
    fn post_item_falls_back_to_title() {
        let item = ContentItem::from_post(&post("", "Announcement"));
        assert_eq!(item.body, "Announcement");
    }

    #[test]
    fn comment_item_uses_parent_url() {
        let p = post("", "Hi");
        let comment = Comment {
            id: "c1".to_string(),
            body: "nice".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap(),
            replies: Vec::new(),
        };
        let item = ContentItem::from_comment(&p, &comment);
        assert_eq!(item.source, p.url);
        assert_eq!(item.external_id, "c1");
        assert_eq!(item.posted_at, comment.created_at);
    }

    #[test]
    fn serializes_as_queue_row() {
        let value = serde_json::to_value(ContentItem::from_post(&post("hello world", "Hi"))).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "source": "https://www.reddit.com/r/startups/comments/p1/x/",
                "external_id": "p1",
                "body": "hello world",
                "posted_at": "2024-05-01T12:00:00Z",
                "processed": false
            })
        );
    }
}
