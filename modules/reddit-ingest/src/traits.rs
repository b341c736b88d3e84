// Seams between the ingest loop and the outside world.
//
// ContentSource: where posts and comment trees come from (Reddit).
// IngestionQueue: where normalized items go (Supabase `ingestion_queue`).
//
// Both are swapped for in-memory mocks in tests (see `testing`).

use anyhow::Result;
use async_trait::async_trait;
use reddit_client::{RedditClient, Thing};
use supabase_client::SupabaseClient;

use crate::types::{Comment, CommentNode, ContentItem, Post};

/// Table the downstream processor reads from.
pub const INGESTION_QUEUE_TABLE: &str = "ingestion_queue";

#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Newest posts in a community, newest first.
    async fn newest_posts(&self, community: &str, limit: u32) -> Result<Vec<Post>>;

    /// The post's comment tree as returned, "load more" stubs included.
    async fn comment_tree(&self, post: &Post) -> Result<Vec<CommentNode>>;
}

#[async_trait]
pub trait IngestionQueue: Send + Sync {
    /// Insert one item. Each call is independent.
    async fn enqueue(&self, item: &ContentItem) -> Result<()>;
}

#[async_trait]
impl ContentSource for RedditClient {
    async fn newest_posts(&self, community: &str, limit: u32) -> Result<Vec<Post>> {
        let links = self.new_posts(community, limit).await?;
        Ok(links
            .into_iter()
            .map(|link| Post {
                id: link.id,
                url: link.url,
                title: link.title,
                selftext: link.selftext,
                created_at: link.created_utc,
            })
            .collect())
    }

    async fn comment_tree(&self, post: &Post) -> Result<Vec<CommentNode>> {
        let things = RedditClient::comment_tree(self, &post.id).await?;
        Ok(convert_things(&things))
    }
}

fn convert_things(things: &[Thing]) -> Vec<CommentNode> {
    things
        .iter()
        .filter_map(|thing| match thing {
            Thing::Comment(data) => Some(CommentNode::Comment(Comment {
                id: data.id.clone(),
                body: data.body.clone(),
                created_at: data.created_utc,
                replies: convert_things(data.children()),
            })),
            Thing::More(more) => Some(CommentNode::More {
                count: more.count,
                children: more.children.clone(),
            }),
            // Submissions never appear inside a comment listing.
            Thing::Link(_) => None,
        })
        .collect()
}

#[async_trait]
impl IngestionQueue for SupabaseClient {
    async fn enqueue(&self, item: &ContentItem) -> Result<()> {
        Ok(self.insert(INGESTION_QUEUE_TABLE, item).await?)
    }
}
