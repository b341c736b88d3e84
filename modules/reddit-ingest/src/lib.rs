pub mod config;
pub mod error;
pub mod ingestor;
pub mod poller;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use config::Config;
pub use error::{ConfigError, IngestError};
pub use ingestor::Ingestor;
pub use poller::{CycleStats, Poller, PollerConfig};
pub use traits::{ContentSource, IngestionQueue};
pub use types::{Comment, CommentNode, ContentItem, Post};
