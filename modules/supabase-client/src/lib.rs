pub mod error;

pub use error::{Result, SupabaseError};

use serde::Serialize;

/// PostgREST lives under this prefix on every Supabase project.
const REST_PATH: &str = "/rest/v1";

pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(url: &str, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Insert a single row into `table`. The row is sent as a JSON object;
    /// nothing is returned on success (`Prefer: return=minimal`).
    pub async fn insert<T: Serialize>(&self, table: &str, row: &T) -> Result<()> {
        let url = format!("{}{}/{}", self.base_url, REST_PATH, table);
        let body = serde_json::to_vec(row)?;

        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header("Prefer", "return=minimal")
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        tracing::trace!(table, "Inserted row");
        Ok(())
    }
}
