//! Canonical submission model shared by every backend.
//!
//! Backend-specific records are mapped into [`Submission`] at the client
//! boundary; nothing past that boundary branches on where a result came from
//! except to build its discussion link.

use serde::{Deserialize, Serialize};

/// Source label carried by every tech-news submission.
pub const HACKER_NEWS_LABEL: &str = "Hacker News";

const REDDIT_URL: &str = "https://www.reddit.com";
const OLD_REDDIT_URL: &str = "https://old.reddit.com";
const HN_URL: &str = "https://news.ycombinator.com";

/// The backend a submission was fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    Reddit,
    HackerNews,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Reddit => "reddit",
            Backend::HackerNews => "hackernews",
        }
    }
}

/// Query mode for the link aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Lookup by URL; only submissions referencing that exact address.
    Exact,
    /// Free-text search; approximate matches ranked by the backend.
    Fuzzy,
}

impl MatchMode {
    pub fn from_exact(exact: bool) -> Self {
        if exact { MatchMode::Exact } else { MatchMode::Fuzzy }
    }

    /// The mode that is not `self`.
    pub fn other(self) -> Self {
        match self {
            MatchMode::Exact => MatchMode::Fuzzy,
            MatchMode::Fuzzy => MatchMode::Exact,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Exact => "exact",
            MatchMode::Fuzzy => "fuzzy",
        }
    }
}

/// A discussion thread about a URL, in backend-neutral form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Submission {
    pub id: String,
    pub title: String,
    /// The submitted link, if the backend reported one.
    pub url: Option<String>,
    pub score: i64,
    pub comment_count: u64,
    /// Unix seconds.
    pub created_at: i64,
    /// Subreddit name, or [`HACKER_NEWS_LABEL`].
    pub source_label: String,
    pub author: String,
    /// Site-relative path of the discussion page.
    pub permalink: String,
    pub backend: Backend,
}

impl Submission {
    /// Absolute link to the discussion page.
    pub fn discussion_url(&self, old_frontend: bool) -> String {
        let base = match self.backend {
            Backend::Reddit if old_frontend => OLD_REDDIT_URL,
            Backend::Reddit => REDDIT_URL,
            Backend::HackerNews => HN_URL,
        };
        if self.permalink.starts_with('/') {
            format!("{base}{}", self.permalink)
        } else {
            format!("{base}/{}", self.permalink)
        }
    }
}

/// Link aggregator results for one query and mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub submissions: Vec<Submission>,
    /// Cached result count under the other match mode, if one is cached.
    pub sibling_count: Option<usize>,
}

/// Ordering applied to a merged result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Age,
    Comments,
    #[default]
    Score,
    Source,
}

/// Sort submissions in place by `key`, ascending unless `desc`.
pub fn sort_submissions(submissions: &mut [Submission], key: SortKey, desc: bool) {
    submissions.sort_by(|a, b| {
        let ord = match key {
            SortKey::Age => a.created_at.cmp(&b.created_at),
            SortKey::Comments => a.comment_count.cmp(&b.comment_count),
            SortKey::Score => a.score.cmp(&b.score),
            SortKey::Source => a.source_label.to_lowercase().cmp(&b.source_label.to_lowercase()),
        };
        if desc { ord.reverse() } else { ord }
    });
}

struct AgeUnit {
    millis: f64,
    name: &'static str,
    decimals: i32,
}

const AGE_UNITS: &[AgeUnit] = &[
    AgeUnit { millis: 1e3 * 60.0 * 60.0 * 24.0 * 30.0 * 12.0, name: "years", decimals: 1 },
    AgeUnit { millis: 1e3 * 60.0 * 60.0 * 24.0 * 30.0, name: "months", decimals: 0 },
    AgeUnit { millis: 1e3 * 60.0 * 60.0 * 24.0, name: "days", decimals: 0 },
    AgeUnit { millis: 1e3 * 60.0 * 60.0, name: "hours", decimals: 0 },
    AgeUnit { millis: 1e3 * 60.0, name: "minutes", decimals: 0 },
    AgeUnit { millis: 1e3, name: "seconds", decimals: 0 },
];

/// Human-readable age of a submission, e.g. `"3 hours"` or `"1.5 years"`.
///
/// Picks the largest unit whose rounded value is at least one.
pub fn relative_age(created_at_secs: i64, now_millis: i64) -> String {
    let diff = (now_millis - created_at_secs * 1000) as f64;

    for unit in AGE_UNITS {
        let scale = 10f64.powi(unit.decimals);
        let value = (diff / unit.millis * scale).round() / scale;
        if value >= 1.0 {
            let name = if value == 1.0 { &unit.name[..unit.name.len() - 1] } else { unit.name };
            return format!("{value} {name}");
        }
    }

    "0 seconds".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(id: &str, backend: Backend) -> Submission {
        Submission {
            id: id.to_string(),
            title: format!("Title {id}"),
            url: Some("https://example.com/a".to_string()),
            score: 0,
            comment_count: 0,
            created_at: 0,
            source_label: "rust".to_string(),
            author: "ferris".to_string(),
            permalink: format!("/r/rust/comments/{id}/title/"),
            backend,
        }
    }

    #[test]
    fn test_match_mode_other() {
        assert_eq!(MatchMode::Exact.other(), MatchMode::Fuzzy);
        assert_eq!(MatchMode::Fuzzy.other(), MatchMode::Exact);
        assert_eq!(MatchMode::from_exact(true), MatchMode::Exact);
    }

    #[test]
    fn test_discussion_url() {
        let reddit = submission("abc", Backend::Reddit);
        assert_eq!(reddit.discussion_url(false), "https://www.reddit.com/r/rust/comments/abc/title/");
        assert_eq!(reddit.discussion_url(true), "https://old.reddit.com/r/rust/comments/abc/title/");

        let hn = Submission { permalink: "/item?id=42".into(), ..submission("42", Backend::HackerNews) };
        assert_eq!(hn.discussion_url(true), "https://news.ycombinator.com/item?id=42");
    }

    #[test]
    fn test_sort_by_score_desc() {
        let mut subs = vec![
            Submission { score: 5, ..submission("a", Backend::Reddit) },
            Submission { score: 50, ..submission("b", Backend::Reddit) },
            Submission { score: 10, ..submission("c", Backend::HackerNews) },
        ];
        sort_submissions(&mut subs, SortKey::Score, true);
        let ids: Vec<_> = subs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn test_sort_by_source_ignores_case() {
        let mut subs = vec![
            Submission { source_label: "rust".into(), ..submission("a", Backend::Reddit) },
            Submission { source_label: HACKER_NEWS_LABEL.into(), ..submission("b", Backend::HackerNews) },
            Submission { source_label: "Programming".into(), ..submission("c", Backend::Reddit) },
        ];
        sort_submissions(&mut subs, SortKey::Source, false);
        let labels: Vec<_> = subs.iter().map(|s| s.source_label.as_str()).collect();
        assert_eq!(labels, [HACKER_NEWS_LABEL, "Programming", "rust"]);
    }

    #[test]
    fn test_sort_by_age_ascending() {
        let mut subs = vec![
            Submission { created_at: 300, ..submission("a", Backend::Reddit) },
            Submission { created_at: 100, ..submission("b", Backend::Reddit) },
        ];
        sort_submissions(&mut subs, SortKey::Age, false);
        assert_eq!(subs[0].id, "b");
    }

    #[test]
    fn test_relative_age() {
        let now = 2_000_000_000_000;
        let now_secs = now / 1000;
        assert_eq!(relative_age(now_secs - 60, now), "1 minute");
        assert_eq!(relative_age(now_secs - 3 * 3600, now), "3 hours");
        assert_eq!(relative_age(now_secs - 540 * 86_400, now), "1.5 years");
        assert_eq!(relative_age(now_secs - 2 * 360 * 86_400, now), "2 years");
        assert_eq!(relative_age(now_secs, now), "0 seconds");
    }
}
