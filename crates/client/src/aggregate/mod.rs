//! Fan-out to both backends and merge.
//!
//! Reddit and Hacker News are queried concurrently and settle independently:
//! one backend failing never cancels or blocks the other. Each failure is
//! recorded as a [`BackendOutcome`] instead of aborting the merge.
//!
//! ### Match mode policy (Reddit only)
//!
//! - Exact first when the policy asks for it and the URL is not a video.
//!   Video ids always go through fuzzy search.
//! - An empty exact answer is re-run in fuzzy mode when `retry_exact_as_fuzzy`
//!   is set; its result replaces the empty one.
//! - Otherwise, with `always_both_modes`, the other mode is fetched in a
//!   detached task purely to warm the cache. Its result is never merged.

pub mod retry;

pub use retry::{Exhausted, with_retry};

use serde::Serialize;
use tabthreads_core::config::RetryPolicy;
use tabthreads_core::{AppConfig, AutoSearchConfig, CachePolicy, MatchMode, Submission, TtlCache};

use crate::BackendError;
use crate::hn::HnClient;
use crate::http::{HttpConfig, JsonClient};
use crate::normalize::{NormalizeOptions, NormalizedQuery, normalize};
use crate::reddit::{RedditClient, RedditConfig, RedditResponse};

/// How one backend fared in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BackendOutcome {
    /// Turned off by policy; not attempted.
    Disabled,
    Succeeded { count: usize },
    Failed { reason: String, attempts: u32 },
}

impl BackendOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, BackendOutcome::Failed { .. })
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, BackendOutcome::Disabled)
    }

    fn from_exhausted(exhausted: Exhausted) -> Self {
        BackendOutcome::Failed { reason: exhausted.error.to_string(), attempts: exhausted.attempts }
    }
}

/// Merged result of one run.
#[derive(Debug, Clone)]
pub struct Aggregate {
    pub query: NormalizedQuery,
    /// Reddit submissions followed by Hacker News submissions.
    pub submissions: Vec<Submission>,
    pub reddit: BackendOutcome,
    pub hackernews: BackendOutcome,
    /// Reddit results cached under the mode that was not returned.
    pub sibling_count: Option<usize>,
}

impl Aggregate {
    /// Every enabled backend failed. False when none is enabled.
    pub fn all_failed(&self) -> bool {
        let enabled = [&self.reddit, &self.hackernews].into_iter().filter(|o| o.is_enabled());
        let (mut any, mut all) = (false, true);
        for outcome in enabled {
            any = true;
            all &= outcome.is_failed();
        }
        any && all
    }

    /// At least one backend failed while another succeeded.
    pub fn partial_failure(&self) -> bool {
        (self.reddit.is_failed() || self.hackernews.is_failed()) && !self.all_failed()
    }

    /// Total comments across merged submissions.
    pub fn comment_total(&self) -> u64 {
        self.submissions.iter().map(|s| s.comment_count).sum()
    }
}

struct RedditRun {
    outcome: BackendOutcome,
    submissions: Vec<Submission>,
    sibling_count: Option<usize>,
}

impl RedditRun {
    fn disabled() -> Self {
        Self { outcome: BackendOutcome::Disabled, submissions: Vec::new(), sibling_count: None }
    }

    fn settled(result: Result<RedditResponse, Exhausted>) -> Self {
        match result {
            Ok(response) => Self {
                outcome: BackendOutcome::Succeeded { count: response.result.submissions.len() },
                submissions: response.result.submissions,
                sibling_count: response.result.sibling_count,
            },
            Err(exhausted) => Self {
                outcome: BackendOutcome::from_exhausted(exhausted),
                submissions: Vec::new(),
                sibling_count: None,
            },
        }
    }
}

/// Orchestrates both backend clients.
#[derive(Clone)]
pub struct Aggregator {
    reddit: RedditClient,
    hn: HnClient,
}

impl Aggregator {
    pub fn new(reddit: RedditClient, hn: HnClient) -> Self {
        Self { reddit, hn }
    }

    /// Build both clients from process configuration over a shared cache.
    pub fn from_config(config: &AppConfig, cache: TtlCache) -> Result<Self, BackendError> {
        let http = JsonClient::new(&HttpConfig { user_agent: config.user_agent.clone(), timeout: config.timeout() })?;
        let reddit = RedditClient::new(
            http.clone(),
            RedditConfig { info_url: config.reddit_info_url.clone(), api_url: config.reddit_api_url.clone() },
            cache.clone(),
        );
        let hn = HnClient::new(http, config.hn_search_url.clone(), cache);
        Ok(Self::new(reddit, hn))
    }

    /// Automatic search: cached reads allowed, every call retried per
    /// `policy.autorun.retry`, exact-to-fuzzy fallback and cache warming
    /// applied.
    pub async fn run(&self, url: &str, policy: &AutoSearchConfig) -> Aggregate {
        let query = normalize(url, NormalizeOptions::from(&policy.search));
        let cache = CachePolicy::new(true, policy.cache.period_minutes);
        let retry = &policy.autorun.retry;

        let reddit = async {
            if !policy.search.sources.reddit {
                return RedditRun::disabled();
            }
            self.run_reddit(&query, cache, policy).await
        };

        let hackernews = async {
            if !policy.search.sources.hackernews {
                return (BackendOutcome::Disabled, Vec::new());
            }
            match with_retry(retry, "hackernews", || self.hn.search(&query, cache)).await {
                Ok(submissions) => (BackendOutcome::Succeeded { count: submissions.len() }, submissions),
                Err(exhausted) => (BackendOutcome::from_exhausted(exhausted), Vec::new()),
            }
        };

        let (reddit, (hn_outcome, hn_submissions)) = tokio::join!(reddit, hackernews);
        Self::merge(query, reddit, hn_outcome, hn_submissions)
    }

    /// Interactive lookup: one attempt per backend, no fallback, no warming.
    ///
    /// `use_cache = false` forces fresh fetches.
    pub async fn lookup(&self, url: &str, policy: &AutoSearchConfig, use_cache: bool) -> Aggregate {
        let query = normalize(url, NormalizeOptions::from(&policy.search));
        let cache = CachePolicy::new(use_cache, policy.cache.period_minutes);
        let mode = primary_mode(&query, policy);
        let once = RetryPolicy::disabled();

        let reddit = async {
            if !policy.search.sources.reddit {
                return RedditRun::disabled();
            }
            RedditRun::settled(with_retry(&once, "reddit", || self.reddit.search(&query, cache, mode)).await)
        };

        let hackernews = async {
            if !policy.search.sources.hackernews {
                return (BackendOutcome::Disabled, Vec::new());
            }
            match with_retry(&once, "hackernews", || self.hn.search(&query, cache)).await {
                Ok(submissions) => (BackendOutcome::Succeeded { count: submissions.len() }, submissions),
                Err(exhausted) => (BackendOutcome::from_exhausted(exhausted), Vec::new()),
            }
        };

        let (reddit, (hn_outcome, hn_submissions)) = tokio::join!(reddit, hackernews);
        Self::merge(query, reddit, hn_outcome, hn_submissions)
    }

    async fn run_reddit(&self, query: &NormalizedQuery, cache: CachePolicy, policy: &AutoSearchConfig) -> RedditRun {
        let retry = &policy.autorun.retry;
        let primary = primary_mode(query, policy);

        let falls_back = primary == MatchMode::Exact && policy.autorun.retry_exact_as_fuzzy;
        let response = match with_retry(retry, "reddit", || self.reddit.search(query, cache, primary)).await {
            Ok(response) if falls_back && response.result.submissions.is_empty() => {
                tracing::debug!(backend = "reddit", query = %query.canonical, "exact search empty, trying fuzzy");
                return self.run_fuzzy_fallback(query, cache, retry).await;
            }
            Ok(response) => response,
            Err(exhausted) if falls_back => {
                tracing::warn!(
                    backend = "reddit",
                    query = %query.canonical,
                    error = %exhausted.error,
                    "exact search failed, trying fuzzy"
                );
                return self.run_fuzzy_fallback(query, cache, retry).await;
            }
            Err(exhausted) => return RedditRun::settled(Err(exhausted)),
        };

        if policy.autorun.always_both_modes && !query.is_special_media {
            self.warm(query.clone(), cache, primary.other(), retry.clone());
        }

        RedditRun::settled(Ok(response))
    }

    async fn run_fuzzy_fallback(&self, query: &NormalizedQuery, cache: CachePolicy, retry: &RetryPolicy) -> RedditRun {
        RedditRun::settled(with_retry(retry, "reddit", || self.reddit.search(query, cache, MatchMode::Fuzzy)).await)
    }

    /// Fetch `mode` in the background so a later request finds it cached.
    fn warm(&self, query: NormalizedQuery, cache: CachePolicy, mode: MatchMode, retry: RetryPolicy) {
        let reddit = self.reddit.clone();
        tokio::spawn(async move {
            let warmed = with_retry(&retry, "reddit", || reddit.search(&query, cache, mode)).await;
            if let Ok(response) = warmed {
                tracing::debug!(
                    backend = "reddit",
                    mode = mode.as_str(),
                    count = response.result.submissions.len(),
                    "cache warmed"
                );
            }
        });
    }

    fn merge(
        query: NormalizedQuery, reddit: RedditRun, hackernews: BackendOutcome, hn_submissions: Vec<Submission>,
    ) -> Aggregate {
        let mut submissions = reddit.submissions;
        submissions.extend(hn_submissions);

        tracing::debug!(
            query = %query.canonical,
            merged = submissions.len(),
            reddit = ?reddit.outcome,
            hackernews = ?hackernews,
            "aggregate settled"
        );

        Aggregate { query, submissions, reddit: reddit.outcome, hackernews, sibling_count: reddit.sibling_count }
    }
}

/// Exact when the policy asks for it, unless the query is a video id.
fn primary_mode(query: &NormalizedQuery, policy: &AutoSearchConfig) -> MatchMode {
    MatchMode::from_exact(policy.search.exact_match && !query.is_special_media)
}
