//! Algolia Hacker News response types.
//!
//! Every field but the id is optional in practice; missing values are
//! defaulted instead of failing the whole response.

use serde::Deserialize;
use tabthreads_core::model::HACKER_NEWS_LABEL;
use tabthreads_core::{Backend, Submission};

const PLACEHOLDER_TITLE: &str = "HN Discussion";
const PLACEHOLDER_AUTHOR: &str = "user";

/// Raw search response.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// Individual story hit.
#[derive(Debug, Deserialize)]
pub struct Hit {
    #[serde(rename = "objectID")]
    pub object_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub num_comments: Option<u64>,
    /// Unix seconds.
    #[serde(default)]
    pub created_at_i: Option<i64>,
    #[serde(default)]
    pub author: Option<String>,
}

impl Hit {
    /// Map into a [`Submission`], using `now` (unix seconds) for a missing
    /// timestamp.
    pub fn into_submission(self, now: i64) -> Submission {
        Submission {
            permalink: format!("/item?id={}", self.object_id),
            id: self.object_id,
            title: self.title.unwrap_or_else(|| PLACEHOLDER_TITLE.to_string()),
            url: self.url,
            score: self.points.unwrap_or(0),
            comment_count: self.num_comments.unwrap_or(0),
            created_at: self.created_at_i.unwrap_or(now),
            source_label: HACKER_NEWS_LABEL.to_string(),
            author: self.author.unwrap_or_else(|| PLACEHOLDER_AUTHOR.to_string()),
            backend: Backend::HackerNews,
        }
    }
}

impl SearchResponse {
    pub fn into_submissions(self, now: i64) -> Vec<Submission> {
        self.hits.into_iter().map(|hit| hit.into_submission(now)).collect()
    }
}
