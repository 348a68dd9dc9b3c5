//! Application configuration with layered loading.
//!
//! Two layers live here:
//!
//! - [`AppConfig`]: process configuration loaded once at start using figment
//!   (environment variables `TABTHREADS_*`, an optional TOML file, built-in
//!   defaults)
//! - [`AutoSearchConfig`]: the user policy, persisted in the synced store and
//!   reloaded as an immutable snapshot for every triggering event

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod policy;
mod validation;

pub use policy::{
    AutoSearchConfig, AutorunOptions, BadgeContent, CacheOptions, FilterList, FilterMode, PolicyStore, RetryPolicy,
    ResultOptions, SearchOptions, Sources,
};
pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (TABTHREADS_*)
/// 2. TOML config file (if TABTHREADS_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite file backing the synced settings scope.
    ///
    /// Set via TABTHREADS_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for backend requests.
    ///
    /// Set via TABTHREADS_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via TABTHREADS_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Reddit lookup-by-URL endpoint.
    #[serde(default = "default_reddit_info_url")]
    pub reddit_info_url: String,

    /// Reddit API base for full-text search and duplicates.
    #[serde(default = "default_reddit_api_url")]
    pub reddit_api_url: String,

    /// Hacker News (Algolia) search endpoint.
    #[serde(default = "default_hn_search_url")]
    pub hn_search_url: String,

    /// Depth of the trigger queue feeding the auto-search dispatcher.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./tabthreads.sqlite")
}

fn default_user_agent() -> String {
    "tabthreads/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_reddit_info_url() -> String {
    "https://reddit.com/api/info.json".into()
}

fn default_reddit_api_url() -> String {
    "https://api.reddit.com".into()
}

fn default_hn_search_url() -> String {
    "https://hn.algolia.com/api/v1/search".into()
}

fn default_channel_capacity() -> usize {
    64
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            reddit_info_url: default_reddit_info_url(),
            reddit_api_url: default_reddit_api_url(),
            hn_search_url: default_hn_search_url(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or environment cannot be parsed, or
    /// if validation fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("TABTHREADS_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        Self::extract(figment.merge(
            Env::prefixed("TABTHREADS_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        ))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
