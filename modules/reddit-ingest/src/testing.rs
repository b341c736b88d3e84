// Test mocks for the ingest loop.
//
// Two mocks matching the two trait boundaries:
// - MockSource (ContentSource) — HashMap-based community→posts, post→comment tree
// - RecordingQueue (IngestionQueue) — records every insert, optional failures
//
// Plus constructors for posts, comments and placeholders.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::traits::{ContentSource, IngestionQueue};
use crate::types::{Comment, CommentNode, ContentItem, Post};

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Fixed point in time offset by `secs`. Keeps ordering in tests readable.
pub fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap_or_default()
}

pub fn post(id: &str, title: &str, selftext: &str, created_secs: i64) -> Post {
    Post {
        id: id.to_string(),
        url: format!("https://www.reddit.com/r/test/comments/{id}/"),
        title: title.to_string(),
        selftext: selftext.to_string(),
        created_at: ts(created_secs),
    }
}

pub fn comment(id: &str, created_secs: i64) -> CommentNode {
    comment_with_replies(id, created_secs, Vec::new())
}

pub fn comment_with_replies(id: &str, created_secs: i64, replies: Vec<CommentNode>) -> CommentNode {
    CommentNode::Comment(Comment {
        id: id.to_string(),
        body: format!("comment {id}"),
        created_at: ts(created_secs),
        replies,
    })
}

pub fn more(count: u64) -> CommentNode {
    CommentNode::More {
        count,
        children: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// MockSource
// ---------------------------------------------------------------------------

/// In-memory content source. Unregistered communities return `Err`;
/// unregistered posts have no comments.
pub struct MockSource {
    posts: HashMap<String, Vec<Post>>,
    trees: HashMap<String, Vec<CommentNode>>,
    failing_trees: HashSet<String>,
    listed: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            posts: HashMap::new(),
            trees: HashMap::new(),
            failing_trees: HashSet::new(),
            listed: Mutex::new(Vec::new()),
        }
    }

    pub fn on_posts(mut self, community: &str, posts: Vec<Post>) -> Self {
        self.posts.insert(community.to_string(), posts);
        self
    }

    pub fn on_comments(mut self, post_id: &str, tree: Vec<CommentNode>) -> Self {
        self.trees.insert(post_id.to_string(), tree);
        self
    }

    pub fn fail_comments(mut self, post_id: &str) -> Self {
        self.failing_trees.insert(post_id.to_string());
        self
    }

    /// Communities whose listings were requested, in order.
    pub fn listed_communities(&self) -> Vec<String> {
        self.listed.lock().unwrap().clone()
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentSource for MockSource {
    async fn newest_posts(&self, community: &str, limit: u32) -> Result<Vec<Post>> {
        self.listed.lock().unwrap().push(community.to_string());
        match self.posts.get(community) {
            Some(posts) => Ok(posts.iter().take(limit as usize).cloned().collect()),
            None => bail!("MockSource: no posts registered for {community}"),
        }
    }

    async fn comment_tree(&self, post: &Post) -> Result<Vec<CommentNode>> {
        if self.failing_trees.contains(&post.id) {
            bail!("MockSource: comment fetch failed for {}", post.id);
        }
        Ok(self.trees.get(&post.id).cloned().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// RecordingQueue
// ---------------------------------------------------------------------------

/// Records every insert attempt. Items whose `external_id` was registered
/// with `fail_on` are rejected and not stored.
pub struct RecordingQueue {
    items: Mutex<Vec<ContentItem>>,
    attempts: Mutex<Vec<String>>,
    failing_ids: HashSet<String>,
}

impl RecordingQueue {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            attempts: Mutex::new(Vec::new()),
            failing_ids: HashSet::new(),
        }
    }

    pub fn fail_on(mut self, external_id: &str) -> Self {
        self.failing_ids.insert(external_id.to_string());
        self
    }

    /// Successfully enqueued items, in insert order.
    pub fn items(&self) -> Vec<ContentItem> {
        self.items.lock().unwrap().clone()
    }

    /// Every `external_id` an insert was attempted for, in order.
    pub fn attempted_ids(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }
}

impl Default for RecordingQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IngestionQueue for RecordingQueue {
    async fn enqueue(&self, item: &ContentItem) -> Result<()> {
        self.attempts.lock().unwrap().push(item.external_id.clone());
        if self.failing_ids.contains(&item.external_id) {
            bail!("RecordingQueue: insert rejected for {}", item.external_id);
        }
        self.items.lock().unwrap().push(item.clone());
        Ok(())
    }
}
