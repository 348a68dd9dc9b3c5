//! Allow/deny gate applied before a trigger may search.

use regex::Regex;
use tabthreads_core::config::{FilterList, FilterMode};

use crate::normalize::strip_query_string;

/// Whether `url` may be searched under `filter`.
///
/// The URL must parse with an http(s) scheme. Patterns are regular
/// expressions tested against the lower-cased URL without its query string;
/// a pattern that fails to compile is used as a plain substring instead.
/// Blank patterns are ignored.
pub fn allows(url: &str, filter: &FilterList) -> bool {
    let url = url.trim();
    if url.is_empty() {
        return false;
    }

    match url::Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        _ => return false,
    }

    let candidate = strip_query_string(url).to_lowercase();
    let matched = filter
        .patterns
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .any(|pattern| pattern_matches(pattern, &candidate));

    match filter.mode {
        FilterMode::Blacklist => !matched,
        FilterMode::Whitelist => matched,
    }
}

fn pattern_matches(pattern: &str, candidate: &str) -> bool {
    match Regex::new(pattern) {
        Ok(re) => re.is_match(candidate),
        Err(e) => {
            tracing::debug!(pattern, error = %e, "filter pattern is not a valid regex, matching as text");
            candidate.contains(&pattern.to_lowercase())
        }
    }
}
