//! Hacker News client over the Algolia search API.
//!
//! One full-text query restricted to the `url` attribute, with analytics off.
//! The backend already folds duplicates, so there is no mode split and no
//! duplicate resolution. Results are cached under `hn:<percent-encoded query>`.

pub mod response;

pub use response::{Hit, SearchResponse};

use tabthreads_core::{CachePolicy, Submission, TtlCache};

use crate::BackendError;
use crate::http::JsonClient;
use crate::normalize::NormalizedQuery;

/// Hacker News client with a read-through session cache.
#[derive(Clone)]
pub struct HnClient {
    http: JsonClient,
    search_url: String,
    cache: TtlCache,
}

impl HnClient {
    pub fn new(http: JsonClient, search_url: impl Into<String>, cache: TtlCache) -> Self {
        Self { http, search_url: search_url.into(), cache }
    }

    pub fn cache_key(query: &str) -> String {
        format!("hn:{}", urlencoding::encode(query))
    }

    /// Search for `query.cleaned`, serving a valid cached entry when
    /// `policy` allows.
    pub async fn search(&self, query: &NormalizedQuery, policy: CachePolicy) -> Result<Vec<Submission>, BackendError> {
        let key = Self::cache_key(&query.cleaned);

        if policy.use_cache
            && let Some(entry) = self.cache.get::<Vec<Submission>>(&key).await?
            && entry.is_valid(policy.ttl_minutes)
        {
            tracing::debug!(backend = "hackernews", key = %key, "cache hit");
            return Ok(entry.payload);
        }

        tracing::debug!(backend = "hackernews", key = %key, "cache miss");

        let params = [("analytics", "false"), ("query", query.cleaned.as_str()), ("restrictSearchableAttributes", "url")];
        let response: SearchResponse = self.http.get_json(&self.search_url, &params).await?;
        let submissions = response.into_submissions(chrono::Utc::now().timestamp());

        if let Err(e) = self.cache.put(&key, &submissions).await {
            tracing::warn!(backend = "hackernews", key = %key, error = %e, "cache write failed");
        }

        Ok(submissions)
    }
}
