use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<&'static str>),
}

/// Failure while ingesting one post. Contained by the poller at post granularity.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to fetch comments for post {post_id}: {source}")]
    Comments {
        post_id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{failed} of {attempted} queue inserts failed for post {post_id}")]
    Submissions {
        post_id: String,
        failed: usize,
        attempted: usize,
    },
}
