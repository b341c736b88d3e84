//! Outer loop: scan every community, hand each post to the ingestor,
//! sleep, repeat until told to stop.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::ingestor::{Ingestor, DEFAULT_COMMENT_LIMIT};
use crate::traits::{ContentSource, IngestionQueue};

/// Newest posts fetched per community per cycle.
pub const DEFAULT_POST_LIMIT: u32 = 20;

/// Pause between cycles (25 minutes).
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1500);

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub post_limit: u32,
    pub comment_limit: usize,
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            post_limit: DEFAULT_POST_LIMIT,
            comment_limit: DEFAULT_COMMENT_LIMIT,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl PollerConfig {
    pub fn with_post_limit(mut self, limit: u32) -> Self {
        self.post_limit = limit;
        self
    }

    pub fn with_comment_limit(mut self, limit: usize) -> Self {
        self.comment_limit = limit;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Counters for one pass over all communities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub communities: usize,
    pub communities_failed: usize,
    pub posts: usize,
    pub posts_failed: usize,
}

impl fmt::Display for CycleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} communities ({} failed), {} posts ({} failed)",
            self.communities, self.communities_failed, self.posts, self.posts_failed
        )
    }
}

pub struct Poller {
    source: Arc<dyn ContentSource>,
    ingestor: Ingestor,
    communities: Vec<String>,
    config: PollerConfig,
}

impl Poller {
    pub fn new(
        source: Arc<dyn ContentSource>,
        queue: Arc<dyn IngestionQueue>,
        communities: Vec<String>,
        config: PollerConfig,
    ) -> Self {
        let ingestor = Ingestor::new(source.clone(), queue).with_comment_limit(config.comment_limit);
        Self {
            source,
            ingestor,
            communities,
            config,
        }
    }

    /// One sequential pass over every community. Failures are logged and
    /// contained: a bad listing skips its community, a bad post skips itself.
    pub async fn run_cycle(&self) -> CycleStats {
        let mut stats = CycleStats::default();

        for community in &self.communities {
            stats.communities += 1;
            info!(community = community.as_str(), "Scanning community");

            let posts = match self
                .source
                .newest_posts(community, self.config.post_limit)
                .await
            {
                Ok(posts) => posts,
                Err(e) => {
                    error!(community = community.as_str(), error = %e, "Failed to fetch posts");
                    stats.communities_failed += 1;
                    continue;
                }
            };

            for post in &posts {
                stats.posts += 1;
                if let Err(e) = self.ingestor.ingest(post).await {
                    error!(
                        community = community.as_str(),
                        post_id = %post.id,
                        error = %e,
                        "Failed to process post"
                    );
                    stats.posts_failed += 1;
                }
            }
        }

        stats
    }

    /// Run cycles back to back, sleeping `interval` between them, until
    /// `shutdown` resolves. Whatever is in flight at that point is dropped.
    /// Returns the number of completed cycles.
    pub async fn run_until<F>(&self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut cycles = 0;

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                stats = self.run_cycle() => {
                    cycles += 1;
                    info!(cycle = cycles, %stats, "Cycle complete");
                }
            }

            info!(
                wait_secs = self.config.interval.as_secs(),
                "Waiting before next cycle"
            );
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }

        info!(cycles, "Shutdown requested, poller stopped");
        cycles
    }
}
