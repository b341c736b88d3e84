use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

// --- OAuth ---

/// App credentials for the client-credentials grant.
#[derive(Debug, Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

/// Form body for `POST /api/v1/access_token`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub grant_type: &'a str,
}

/// Successful response from the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
    pub scope: Option<String>,
}

// --- Listings ---

/// Sort order for a subreddit listing. Maps to the URL path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingSort {
    Hot,
    New,
    Rising,
    Top,
    Controversial,
}

impl ListingSort {
    pub fn as_path(&self) -> &'static str {
        match self {
            ListingSort::Hot => "hot",
            ListingSort::New => "new",
            ListingSort::Rising => "rising",
            ListingSort::Top => "top",
            ListingSort::Controversial => "controversial",
        }
    }
}

/// A page of things. Reddit wraps every collection in one of these.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<Thing>,
    pub after: Option<String>,
    pub before: Option<String>,
}

/// A single listing child, discriminated by Reddit's `kind` prefix.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum Thing {
    #[serde(rename = "t3")]
    Link(Link),
    #[serde(rename = "t1")]
    Comment(CommentData),
    /// "load more comments" placeholder for a truncated subtree.
    #[serde(rename = "more")]
    More(MoreData),
}

/// A submission (`t3`).
#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub id: String,
    /// Fullname, e.g. `t3_abc123`.
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    pub url: String,
    pub permalink: String,
    pub subreddit: Option<String>,
    pub author: Option<String>,
    pub num_comments: Option<i64>,
    #[serde(default)]
    pub is_self: bool,
    #[serde(deserialize_with = "epoch_seconds")]
    pub created_utc: DateTime<Utc>,
}

/// A comment (`t1`).
#[derive(Debug, Clone, Deserialize)]
pub struct CommentData {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub body: String,
    pub author: Option<String>,
    pub parent_id: Option<String>,
    pub link_id: Option<String>,
    pub score: Option<i64>,
    #[serde(deserialize_with = "epoch_seconds")]
    pub created_utc: DateTime<Utc>,
    /// Child comments. Reddit sends `""` when there are none.
    #[serde(default, deserialize_with = "replies")]
    pub replies: Option<Box<Listing>>,
}

impl CommentData {
    /// Direct children of this comment, placeholders included.
    pub fn children(&self) -> &[Thing] {
        match &self.replies {
            Some(listing) => &listing.data.children,
            None => &[],
        }
    }
}

/// Placeholder for comments not included in the response.
#[derive(Debug, Clone, Deserialize)]
pub struct MoreData {
    pub id: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub children: Vec<String>,
    pub parent_id: Option<String>,
}

fn epoch_seconds<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    let whole = secs.trunc();
    let nanos = ((secs - whole) * 1_000_000_000.0).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
        .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {secs}")))
}

fn replies<'de, D>(deserializer: D) -> Result<Option<Box<Listing>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Listing(Box<Listing>),
        Empty(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Listing(listing)) => Some(listing),
        Some(Raw::Empty(_)) | None => None,
    })
}
