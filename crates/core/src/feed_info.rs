//! Feed metadata recorded by a polling client.
//!
//! The caches never look inside a [`FeedInfo`]; it is the default entry type
//! and carries what a conditional GET needs on the next poll.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Metadata about one fetched feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedInfo {
    pub id: String,
    pub url: Url,
    pub fetched_at: DateTime<Utc>,

    /// Value of the `Last-Modified` response header.
    pub last_modified: Option<String>,
    /// Value of the `ETag` response header.
    pub etag: Option<String>,

    /// Synchronization state owned by the fetcher.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl FeedInfo {
    /// Create metadata for a feed fetched now, with no validators.
    pub fn new(url: Url) -> Self {
        Self {
            id: url.to_string(),
            url,
            fetched_at: Utc::now(),
            last_modified: None,
            etag: None,
            payload: serde_json::Value::Null,
        }
    }

    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    pub fn with_last_modified(mut self, last_modified: impl Into<String>) -> Self {
        self.last_modified = Some(last_modified.into());
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Whether a conditional GET can be issued for this feed.
    pub fn has_validators(&self) -> bool {
        self.etag.is_some() || self.last_modified.is_some()
    }
}
