//! Configuration validation rules.
//!
//! Checks `AppConfig` after it has been loaded from environment, files, or
//! defaults, and `AutoSearchConfig` before it is persisted.

use crate::config::{AppConfig, AutoSearchConfig};
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

fn validate_endpoint(field: &str, value: &str) -> Result<(), ConfigError> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(_) => Err(invalid(field, "must use http or https")),
        Err(e) => Err(ConfigError::Invalid { field: field.into(), reason: e.to_string() }),
    }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - an endpoint is not an http(s) URL
    /// - `channel_capacity` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        validate_endpoint("reddit_info_url", &self.reddit_info_url)?;
        validate_endpoint("reddit_api_url", &self.reddit_api_url)?;
        validate_endpoint("hn_search_url", &self.hn_search_url)?;

        if self.channel_capacity == 0 {
            return Err(invalid("channel_capacity", "must be greater than 0"));
        }

        Ok(())
    }
}

impl AutoSearchConfig {
    /// Validate a policy before it is stored.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the cache period is 0 or the retry
    /// attempt ceiling is outside 1..=10.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.period_minutes == 0 {
            return Err(invalid("cache.period_minutes", "must be greater than 0"));
        }

        if !(1..=10).contains(&self.autorun.retry.max_attempts) {
            return Err(invalid("autorun.retry.max_attempts", "must be between 1 and 10"));
        }

        if !self.search.sources.reddit && !self.search.sources.hackernews {
            tracing::warn!("both sources are disabled; searches will always be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(AppConfig::default().validate().is_ok());
        assert!(AutoSearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { timeout_ms: 301_000, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_endpoint_scheme() {
        let config = AppConfig { hn_search_url: "ftp://hn.example/search".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "hn_search_url"));

        let config = AppConfig { reddit_api_url: "not a url".into(), ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_channel_capacity() {
        let config = AppConfig { channel_capacity: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_retry_attempts() {
        let mut policy = AutoSearchConfig::default();
        policy.autorun.retry.max_attempts = 11;
        let result = policy.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "autorun.retry.max_attempts"));

        policy.autorun.retry.max_attempts = 1;
        assert!(policy.validate().is_ok());
    }
}
