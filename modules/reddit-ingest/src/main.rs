use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use reddit_client::RedditClient;
use reddit_ingest::{Config, Poller, PollerConfig};
use supabase_client::SupabaseClient;

/// Poll subreddits for new posts and comments and push them onto the ingestion queue.
#[derive(Parser, Debug)]
#[command(name = "reddit-ingest")]
struct Cli {
    /// Subreddits to poll, e.g. `startups` or `r/SaaS`
    #[arg(required = true, num_args = 1..)]
    communities: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("reddit_ingest=info".parse()?))
        .init();

    // Fails before any network activity if anything is missing
    let config = Config::from_env()?;

    info!(communities = ?cli.communities, "Reddit ingest starting");

    let reddit = RedditClient::new(config.reddit_credentials());
    let queue = SupabaseClient::new(&config.supabase_url, config.supabase_key.clone());

    let poller = Poller::new(
        Arc::new(reddit),
        Arc::new(queue),
        cli.communities,
        PollerConfig::default(),
    );

    let cycles = poller.run_until(shutdown_signal()).await;
    info!(cycles, "Interrupted, exiting");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for interrupt; running until killed");
        std::future::pending::<()>().await;
    }
}
