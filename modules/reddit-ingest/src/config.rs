use crate::error::ConfigError;
use reddit_client::RedditCredentials;

/// Environment variables that must be present before any work starts.
pub const REQUIRED_VARS: [&str; 5] = [
    "SUPABASE_URL",
    "SUPABASE_KEY",
    "REDDIT_CLIENT_ID",
    "REDDIT_CLIENT_SECRET",
    "REDDIT_USER_AGENT",
];

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Queue
    pub supabase_url: String,
    pub supabase_key: String,

    // Reddit
    pub reddit_client_id: String,
    pub reddit_client_secret: String,
    pub reddit_user_agent: String,
}

impl Config {
    /// Load from the process environment (and `.env`, if present).
    /// Every missing variable is reported at once.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    /// Build from an arbitrary key lookup. Empty values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let values = REQUIRED_VARS.map(|key| lookup(key).filter(|v| !v.trim().is_empty()));

        let missing: Vec<&'static str> = REQUIRED_VARS
            .iter()
            .zip(&values)
            .filter(|(_, value)| value.is_none())
            .map(|(key, _)| *key)
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingEnv(missing));
        }

        // Same order as REQUIRED_VARS.
        let [supabase_url, supabase_key, reddit_client_id, reddit_client_secret, reddit_user_agent] =
            values.map(Option::unwrap_or_default);

        Ok(Self {
            supabase_url,
            supabase_key,
            reddit_client_id,
            reddit_client_secret,
            reddit_user_agent,
        })
    }

    pub fn reddit_credentials(&self) -> RedditCredentials {
        RedditCredentials {
            client_id: self.reddit_client_id.clone(),
            client_secret: self.reddit_client_secret.clone(),
            user_agent: self.reddit_user_agent.clone(),
        }
    }

    fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let head: String = val.chars().take(5).collect();
            format!("{}...({} chars)", head, val.len())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  SUPABASE_URL: {}", self.supabase_url);
        tracing::info!("  SUPABASE_KEY: {}", preview(&self.supabase_key));
        tracing::info!("  REDDIT_CLIENT_ID: {}", preview(&self.reddit_client_id));
        tracing::info!("  REDDIT_CLIENT_SECRET: {}", preview(&self.reddit_client_secret));
        tracing::info!("  REDDIT_USER_AGENT: {}", self.reddit_user_agent);
    }
}
