pub mod error;
pub mod types;

pub use error::{RedditError, Result};
pub use types::{
    AccessToken, CommentData, Link, Listing, ListingData, ListingSort, MoreData,
    RedditCredentials, Thing,
};

use std::time::{Duration, Instant};

use reqwest::header::USER_AGENT;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use types::TokenRequest;

const AUTH_BASE_URL: &str = "https://www.reddit.com";
const API_BASE_URL: &str = "https://oauth.reddit.com";

/// Re-request the token when it has less than this long left.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Reddit caps listing pages at 100 items.
const MAX_LISTING_LIMIT: u32 = 100;

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Application-only (read-only) Reddit API client.
pub struct RedditClient {
    client: reqwest::Client,
    credentials: RedditCredentials,
    auth_base: String,
    api_base: String,
    token: Mutex<Option<CachedToken>>,
}

impl RedditClient {
    pub fn new(credentials: RedditCredentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            auth_base: AUTH_BASE_URL.to_string(),
            api_base: API_BASE_URL.to_string(),
            token: Mutex::new(None),
        }
    }

    /// Point the client at different hosts. Used by tests against a mock server.
    pub fn with_endpoints(mut self, auth_base: &str, api_base: &str) -> Self {
        self.auth_base = auth_base.trim_end_matches('/').to_string();
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    /// Bearer token for API calls. Cached until shortly before it expires.
    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() + TOKEN_REFRESH_MARGIN {
                return Ok(token.value.clone());
            }
        }

        let fresh = self.request_token().await?;
        tracing::debug!(
            expires_in = fresh.expires_in,
            scope = fresh.scope.as_deref().unwrap_or(""),
            "Obtained Reddit access token"
        );
        let value = fresh.access_token.clone();
        *cached = Some(CachedToken {
            value: fresh.access_token,
            expires_at: Instant::now() + Duration::from_secs(fresh.expires_in),
        });
        Ok(value)
    }

    async fn request_token(&self) -> Result<AccessToken> {
        let url = format!("{}/api/v1/access_token", self.auth_base);
        let resp = self
            .client
            .post(&url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .header(USER_AGENT, &self.credentials.user_agent)
            .form(&TokenRequest {
                grant_type: "client_credentials",
            })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(RedditError::Auth(format!("status {}: {}", status.as_u16(), body)));
        }
        if !status.is_success() {
            return Err(RedditError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        // Bad credentials can come back as 200 with an `error` field.
        let value: serde_json::Value = serde_json::from_str(&body)?;
        if let Some(err) = value.get("error") {
            return Err(RedditError::Auth(err.to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let token = self.access_token().await?;
        let url = format!("{}{}", self.api_base, path);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .header(USER_AGENT, &self.credentials.user_agent)
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RedditError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch one page of submissions from a subreddit.
    pub async fn subreddit_posts(
        &self,
        subreddit: &str,
        sort: ListingSort,
        limit: u32,
    ) -> Result<Vec<Link>> {
        let subreddit = subreddit_name(subreddit);
        let limit = limit.min(MAX_LISTING_LIMIT);
        tracing::debug!(subreddit, sort = sort.as_path(), limit, "Fetching subreddit listing");

        let path = format!("/r/{}/{}", subreddit, sort.as_path());
        let listing: Listing = self
            .get_json(
                &path,
                &[("limit", limit.to_string()), ("raw_json", "1".to_string())],
            )
            .await?;

        Ok(listing
            .data
            .children
            .into_iter()
            .filter_map(|thing| match thing {
                Thing::Link(link) => Some(link),
                _ => None,
            })
            .collect())
    }

    /// Newest submissions first.
    pub async fn new_posts(&self, subreddit: &str, limit: u32) -> Result<Vec<Link>> {
        self.subreddit_posts(subreddit, ListingSort::New, limit).await
    }

    /// Top-level comments of a submission, with nested replies and
    /// "more" placeholders left as returned. Placeholders are not followed.
    pub async fn comment_tree(&self, article_id: &str) -> Result<Vec<Thing>> {
        let article_id = article_id.trim_start_matches("t3_");
        let path = format!("/comments/{}", article_id);
        let mut listings: Vec<Listing> = self
            .get_json(&path, &[("raw_json", "1".to_string())])
            .await?;

        // [0] is the submission itself, [1] its comments.
        if listings.len() < 2 {
            return Err(RedditError::Parse(format!(
                "expected 2 listings for article {}, got {}",
                article_id,
                listings.len()
            )));
        }
        let comments = listings.swap_remove(1);
        tracing::debug!(
            article_id,
            top_level = comments.data.children.len(),
            "Fetched comment tree"
        );
        Ok(comments.data.children)
    }
}

/// Bare subreddit name from `rust`, `r/rust` or `/r/rust/`.
fn subreddit_name(input: &str) -> &str {
    let trimmed = input.trim().trim_matches('/');
    trimmed.strip_prefix("r/").unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subreddit_name_accepts_prefixed_forms() {
        assert_eq!(subreddit_name("SaaS"), "SaaS");
        assert_eq!(subreddit_name("r/SaaS"), "SaaS");
        assert_eq!(subreddit_name("/r/SaaS"), "SaaS");
        assert_eq!(subreddit_name("/r/SaaS/"), "SaaS");
    }
}
