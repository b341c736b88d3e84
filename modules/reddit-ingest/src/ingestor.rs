//! Turns one discovered post into queue items: the post itself plus its
//! newest comments.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::IngestError;
use crate::traits::{ContentSource, IngestionQueue};
use crate::types::{Comment, CommentNode, ContentItem, Post};

/// How many comments per post are forwarded.
pub const DEFAULT_COMMENT_LIMIT: usize = 20;

pub struct Ingestor {
    source: Arc<dyn ContentSource>,
    queue: Arc<dyn IngestionQueue>,
    comment_limit: usize,
}

impl Ingestor {
    pub fn new(source: Arc<dyn ContentSource>, queue: Arc<dyn IngestionQueue>) -> Self {
        Self {
            source,
            queue,
            comment_limit: DEFAULT_COMMENT_LIMIT,
        }
    }

    pub fn with_comment_limit(mut self, limit: usize) -> Self {
        self.comment_limit = limit;
        self
    }

    /// Enqueue the post and its newest comments, one insert per item.
    ///
    /// Every insert is attempted even if earlier ones fail; failures are
    /// reported together once the pass is done.
    pub async fn ingest(&self, post: &Post) -> Result<(), IngestError> {
        let mut attempted = 0;
        let mut failed = 0;

        attempted += 1;
        if !self.submit(&ContentItem::from_post(post)).await {
            failed += 1;
        }

        let tree = self
            .source
            .comment_tree(post)
            .await
            .map_err(|source| IngestError::Comments {
                post_id: post.id.clone(),
                source,
            })?;

        let comments = flatten_comments(tree);
        let total = comments.len();
        let selected = select_newest(comments, self.comment_limit);
        debug!(post_id = %post.id, total, selected = selected.len(), "Selected comments");

        for comment in &selected {
            attempted += 1;
            if !self.submit(&ContentItem::from_comment(post, comment)).await {
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(IngestError::Submissions {
                post_id: post.id.clone(),
                failed,
                attempted,
            });
        }
        Ok(())
    }

    async fn submit(&self, item: &ContentItem) -> bool {
        match self.queue.enqueue(item).await {
            Ok(()) => true,
            Err(e) => {
                warn!(external_id = %item.external_id, error = %e, "Queue insert failed");
                false
            }
        }
    }
}

/// Every real comment in the tree, depth-first. "load more" stubs are
/// dropped, not followed.
pub fn flatten_comments(tree: Vec<CommentNode>) -> Vec<Comment> {
    let mut out = Vec::new();
    let mut stack: Vec<CommentNode> = tree.into_iter().rev().collect();

    while let Some(node) = stack.pop() {
        match node {
            CommentNode::Comment(mut comment) => {
                let replies = std::mem::take(&mut comment.replies);
                stack.extend(replies.into_iter().rev());
                out.push(comment);
            }
            CommentNode::More { .. } => {}
        }
    }

    out
}

/// The `limit` most recently created comments, newest first. Ties keep
/// their tree order.
pub fn select_newest(mut comments: Vec<Comment>, limit: usize) -> Vec<Comment> {
    comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    comments.truncate(limit);
    comments
}
