//! Reddit (link aggregator) client.
//!
//! ### Endpoints
//!
//! - **Exact**: `{info_url}?url=<query>`, submissions of that exact address
//! - **Fuzzy**: `{api_url}/search.json?sort=top&t=all&limit=100&q=url:<query>`
//! - **Duplicates**: `{api_url}/duplicates/<id>`, other submissions of the
//!   first result's link
//!
//! ### Caching
//!
//! Results live under `reddit:<percent-encoded query>`, one slot per match
//! mode. A fetched result is also written under the protocol-stripped query.
//! The slot of the other mode is only read, to report a sibling count.
//!
//! The client never retries; every failure goes back to the caller.

pub mod duplicates;
pub mod response;

pub use duplicates::{Enrichment, splice_duplicates};
pub use response::{Link, Listing};

use tabthreads_core::cache::ModalEntry;
use tabthreads_core::{CachePolicy, MatchMode, SearchResult, Submission, TtlCache};

use crate::http::JsonClient;
use crate::normalize::{NormalizedQuery, strip_protocol};
use crate::BackendError;

const DEFAULT_INFO_URL: &str = "https://reddit.com/api/info.json";
const DEFAULT_API_URL: &str = "https://api.reddit.com";

/// Page size of the fuzzy search; the largest Reddit serves.
const SEARCH_LIMIT: &str = "100";

/// Reddit endpoint configuration.
#[derive(Debug, Clone)]
pub struct RedditConfig {
    /// Lookup-by-URL endpoint (default: https://reddit.com/api/info.json).
    pub info_url: String,
    /// API base for search and duplicates (default: https://api.reddit.com).
    pub api_url: String,
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self { info_url: DEFAULT_INFO_URL.to_string(), api_url: DEFAULT_API_URL.to_string() }
    }
}

/// A Reddit search answer with its duplicate-resolution outcome.
#[derive(Debug, Clone)]
pub struct RedditResponse {
    pub result: SearchResult,
    pub enrichment: Enrichment,
    pub from_cache: bool,
}

/// Reddit client with a read-through session cache.
#[derive(Clone)]
pub struct RedditClient {
    http: JsonClient,
    config: RedditConfig,
    cache: TtlCache,
}

impl RedditClient {
    pub fn new(http: JsonClient, config: RedditConfig, cache: TtlCache) -> Self {
        Self { http, config, cache }
    }

    /// Cache key for a query string.
    pub fn cache_key(query: &str) -> String {
        format!("reddit:{}", urlencoding::encode(query))
    }

    /// Search in `mode`, serving a valid cached slot when `policy` allows.
    pub async fn search(
        &self, query: &NormalizedQuery, policy: CachePolicy, mode: MatchMode,
    ) -> Result<RedditResponse, BackendError> {
        let key = Self::cache_key(&query.canonical);
        let cached = match self.cache.get_modal::<Vec<Submission>>(&key).await {
            Ok(cached) => cached.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(backend = "reddit", key = %key, error = %e, "cache read failed, fetching without it");
                ModalEntry::default()
            }
        };
        let sibling_count = cached.slot(mode.other()).map(|entry| entry.payload.len());

        if policy.use_cache
            && let Some(entry) = cached.slot(mode)
            && entry.is_valid(policy.ttl_minutes)
        {
            tracing::debug!(backend = "reddit", mode = mode.as_str(), key = %key, "cache hit");
            return Ok(RedditResponse {
                result: SearchResult { submissions: entry.payload.clone(), sibling_count },
                enrichment: Enrichment::Skipped,
                from_cache: true,
            });
        }

        tracing::debug!(backend = "reddit", mode = mode.as_str(), key = %key, "cache miss");

        let primary = match mode {
            MatchMode::Exact => self.fetch_exact(&query.canonical).await?,
            MatchMode::Fuzzy => self.fetch_fuzzy(&query.canonical).await?,
        };
        let (submissions, enrichment) = self.resolve_duplicates(primary).await;

        self.store(&query.canonical, mode, &submissions).await;

        Ok(RedditResponse { result: SearchResult { submissions, sibling_count }, enrichment, from_cache: false })
    }

    async fn fetch_exact(&self, query: &str) -> Result<Vec<Submission>, BackendError> {
        let listing: Listing = self.http.get_json(&self.config.info_url, &[("url", query)]).await?;
        Ok(listing.into_submissions())
    }

    async fn fetch_fuzzy(&self, query: &str) -> Result<Vec<Submission>, BackendError> {
        let url = format!("{}/search.json", self.config.api_url);
        let q = format!("url:{query}");
        let params = [("sort", "top"), ("t", "all"), ("limit", SEARCH_LIMIT), ("q", q.as_str())];
        let listing: Listing = self.http.get_json(&url, &params).await?;
        Ok(listing.into_submissions())
    }

    async fn fetch_duplicates(&self, id: &str) -> Result<Vec<Submission>, BackendError> {
        let url = format!("{}/duplicates/{}", self.config.api_url, urlencoding::encode(id));
        let listings: Vec<Listing> = self.http.get_json(&url, &[]).await?;
        Ok(response::duplicates_from(listings))
    }

    /// Merge in duplicates of the first submission. Never fails.
    async fn resolve_duplicates(&self, primary: Vec<Submission>) -> (Vec<Submission>, Enrichment) {
        let Some(first_id) = primary.first().map(|s| s.id.clone()) else {
            return (primary, Enrichment::Skipped);
        };

        match self.fetch_duplicates(&first_id).await {
            Ok(siblings) => {
                let (merged, added) = splice_duplicates(primary, siblings);
                (merged, Enrichment::Applied { added })
            }
            Err(e) => {
                tracing::warn!(backend = "reddit", id = %first_id, error = %e, "duplicate lookup failed");
                (primary, Enrichment::Failed { reason: e.to_string() })
            }
        }
    }

    /// Write `submissions` into the `mode` slot under the query and its
    /// protocol-stripped form. Write failures are logged, not returned.
    async fn store(&self, query: &str, mode: MatchMode, submissions: &[Submission]) {
        let mut keys = vec![Self::cache_key(query)];
        let stripped = Self::cache_key(&strip_protocol(query));
        if stripped != keys[0] {
            keys.push(stripped);
        }

        for key in keys {
            if let Err(e) = self.cache.put_mode(&key, mode, submissions.to_vec()).await {
                tracing::warn!(backend = "reddit", key = %key, error = %e, "cache write failed");
            }
        }
    }
}
