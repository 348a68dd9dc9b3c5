//! User policy for searches and auto-search.
//!
//! The policy is stored as JSON under [`OPTIONS_KEY`] in the synced scope.
//! Each triggering event loads one snapshot and passes it down by reference;
//! nothing below the event handler reads ambient configuration.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::cache::{KvStore, Scope};
use crate::model::SortKey;

/// Synced-scope key holding the serialized policy.
pub const OPTIONS_KEY: &str = "options";

/// Complete user policy snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct AutoSearchConfig {
    pub cache: CacheOptions,
    pub search: SearchOptions,
    pub autorun: AutorunOptions,
    pub filterlist: FilterList,
    pub results: ResultOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct CacheOptions {
    /// Minutes a cached search result stays valid.
    pub period_minutes: u32,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self { period_minutes: 30 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct SearchOptions {
    /// Query the link aggregator by exact URL first.
    pub exact_match: bool,
    /// Drop the query string and fragment before searching.
    pub ignore_query_string: bool,
    /// Collapse video platform URLs to their video id.
    pub media_handling: bool,
    pub sources: Sources,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { exact_match: true, ignore_query_string: true, media_handling: true, sources: Sources::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct Sources {
    pub reddit: bool,
    pub hackernews: bool,
}

impl Default for Sources {
    fn default() -> Self {
        Self { reddit: true, hackernews: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct AutorunOptions {
    /// Search when a surface navigates to a new location.
    pub on_location_change: bool,
    /// Search when a surface becomes active.
    pub on_activate: bool,
    /// Re-run in fuzzy mode when exact mode finds nothing.
    pub retry_exact_as_fuzzy: bool,
    /// Also run the non-primary mode to warm the cache.
    pub always_both_modes: bool,
    pub retry: RetryPolicy,
    pub badge_content: BadgeContent,
}

impl Default for AutorunOptions {
    fn default() -> Self {
        Self {
            on_location_change: true,
            on_activate: true,
            retry_exact_as_fuzzy: true,
            always_both_modes: false,
            retry: RetryPolicy::default(),
            badge_content: BadgeContent::default(),
        }
    }
}

/// Bounded retry applied to every backend call made by auto-search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retry on error; when false the first failure is final.
    pub enabled: bool,
    pub max_attempts: u32,
    pub interval_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { enabled: true, max_attempts: 5, interval_ms: 5_000 }
    }
}

impl RetryPolicy {
    /// A policy that gives up after the first failure.
    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }

    /// Attempts permitted for one call, never less than one.
    pub fn attempts(&self) -> u32 {
        if self.enabled { self.max_attempts.max(1) } else { 1 }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// What the badge counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BadgeContent {
    #[default]
    Submissions,
    Comments,
}

/// How the filter patterns gate a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Any matching pattern excludes the URL.
    #[default]
    Blacklist,
    /// A matching pattern is required.
    Whitelist,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct FilterList {
    pub mode: FilterMode,
    /// Regular expressions matched against the lower-cased URL.
    pub patterns: Vec<String>,
}

/// Presentation of interactive lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default)]
pub struct ResultOptions {
    pub order_by: SortKey,
    pub desc: bool,
    /// Link Reddit discussions to the old frontend.
    pub old_frontend: bool,
}

impl Default for ResultOptions {
    fn default() -> Self {
        Self { order_by: SortKey::Score, desc: true, old_frontend: false }
    }
}

/// Loads and saves the policy in the synced scope.
#[derive(Clone)]
pub struct PolicyStore {
    store: Arc<dyn KvStore>,
}

impl PolicyStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Load the current snapshot, falling back to defaults.
    ///
    /// A stored value that fails to decode is logged and replaced by the
    /// defaults for this snapshot; it is not overwritten.
    pub async fn load(&self) -> Result<AutoSearchConfig, Error> {
        let Some(value) = self.store.get(Scope::Synced, OPTIONS_KEY).await? else {
            return Ok(AutoSearchConfig::default());
        };

        match serde_json::from_value(value) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(error = %e, "stored options are unreadable, using defaults");
                Ok(AutoSearchConfig::default())
            }
        }
    }

    /// Validate and persist `config`.
    pub async fn save(&self, config: &AutoSearchConfig) -> Result<(), Error> {
        config.validate()?;
        let value = serde_json::to_value(config)?;
        self.store.set(Scope::Synced, OPTIONS_KEY, value).await
    }
}
