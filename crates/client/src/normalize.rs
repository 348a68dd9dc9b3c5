//! URL normalization for backend queries and cache keys.
//!
//! ### Canonical form
//! - Drop query parameters whose key contains a tracking marker
//!   (`utm_`, `clid`, `fbclid`, `gclid`, `ref`, `source`, `_ga`)
//! - Optionally drop the whole query string and fragment
//! - Strip `http(s)://`, a leading `www.` and one trailing slash
//!
//! ### Video URLs
//! Short-link, watch, embed, shorts and live URLs of the video platform
//! collapse to the bare 11-character video id, so every shape of the same
//! video shares one cache key.
//!
//! Input that does not parse as a URL is returned unchanged.

use std::sync::LazyLock;

use regex::Regex;
use tabthreads_core::config::SearchOptions;

/// Substrings that mark a query parameter key as tracking noise.
const TRACKING_MARKERS: &[&str] = &["utm_", "clid", "fbclid", "gclid", "ref", "source", "_ga"];

static MEDIA_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(?:youtu\.be/|youtube(?:-nocookie)?\.com/(?:[^/\n\s]+/\S+/|(?:v|shorts|watch|live|e(?:mbed)?)/|\S*?(?:[?&]|%3F)v(?:=|%3D)))([^"&?/\s]{11})"#,
    )
    .expect("media id pattern is valid")
});

static SCHEME_AND_WWW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://(?:www\.)?").expect("scheme pattern is valid"));

static SCHEME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("scheme pattern is valid"));

/// Caller-supplied normalization flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Drop query string and fragment (ignored when a video id matched).
    pub ignore_query_string: bool,
    /// Detect video URLs and collapse them to their id.
    pub media_handling: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self { ignore_query_string: true, media_handling: true }
    }
}

impl From<&SearchOptions> for NormalizeOptions {
    fn from(search: &SearchOptions) -> Self {
        Self { ignore_query_string: search.ignore_query_string, media_handling: search.media_handling }
    }
}

/// A URL prepared for querying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    /// The input, trimmed.
    pub raw: String,
    /// Link aggregator query and cache key (before percent-encoding).
    pub canonical: String,
    /// Tracking-free, scheme-less form of `raw`; the tech-news query.
    pub cleaned: String,
    pub is_special_media: bool,
    pub media_id: Option<String>,
}

impl NormalizedQuery {
    fn passthrough(raw: String) -> Self {
        Self { canonical: raw.clone(), cleaned: raw.clone(), raw, is_special_media: false, media_id: None }
    }
}

/// Normalize `input` for querying. Never fails.
pub fn normalize(input: &str, opts: NormalizeOptions) -> NormalizedQuery {
    let raw = input.trim().to_string();

    let Some(cleaned) = clean(&raw) else {
        tracing::debug!(url = %raw, "unparseable URL, searching as-is");
        return NormalizedQuery::passthrough(raw);
    };

    if opts.media_handling
        && let Some(id) = extract_media_id(&raw)
    {
        return NormalizedQuery { raw, canonical: id.clone(), cleaned, is_special_media: true, media_id: Some(id) };
    }

    let canonical = if opts.ignore_query_string {
        clean(strip_query_string(&raw)).unwrap_or_else(|| cleaned.clone())
    } else {
        cleaned.clone()
    };

    NormalizedQuery { raw, canonical, cleaned, is_special_media: false, media_id: None }
}

/// Video id in `url`, with any leading dashes removed.
pub fn extract_media_id(url: &str) -> Option<String> {
    let caps = MEDIA_ID.captures(url)?;
    let id = caps.get(1)?.as_str().trim_start_matches('-');
    (!id.is_empty()).then(|| id.to_string())
}

/// Everything before the first `?` or `#`.
pub fn strip_query_string(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}

/// `url` without a leading `http://` or `https://`.
pub fn strip_protocol(url: &str) -> String {
    SCHEME.replace(url, "").into_owned()
}

/// Parse leniently, defaulting the scheme to https when none is given.
fn parse(input: &str) -> Option<url::Url> {
    if input.is_empty() {
        return None;
    }
    let with_scheme = if input.contains("://") { input.to_string() } else { format!("https://{input}") };
    url::Url::parse(&with_scheme).ok()
}

fn clean(input: &str) -> Option<String> {
    let mut parsed = parse(input)?;

    let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
    let kept: Vec<&(String, String)> = pairs
        .iter()
        .filter(|(key, _)| !TRACKING_MARKERS.iter().any(|marker| key.contains(*marker)))
        .collect();

    if kept.len() != pairs.len() {
        if kept.is_empty() {
            parsed.set_query(None);
        } else {
            parsed
                .query_pairs_mut()
                .clear()
                .extend_pairs(kept.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
    }

    let serialized = parsed.to_string();
    let stripped = SCHEME_AND_WWW.replace(&serialized, "");
    Some(stripped.strip_suffix('/').unwrap_or(&*stripped).to_string())
}
