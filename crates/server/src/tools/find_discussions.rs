//! find_discussions tool implementation.
//!
//! Interactive lookup for one URL: a single attempt per enabled backend,
//! results sorted per the stored policy.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tabthreads_client::BackendOutcome;
use tabthreads_core::cache::now_millis;
use tabthreads_core::model::{relative_age, sort_submissions};
use tabthreads_core::{Backend, Error, Submission};

use crate::state::AppState;

/// Input parameters for find_discussions tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FindDiscussionsParams {
    /// The page URL to find discussions for.
    pub url: String,

    /// Skip cached results and query the backends again.
    #[serde(default)]
    pub force_refresh: bool,
}

/// One discussion thread.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Discussion {
    pub title: String,
    /// Subreddit name or "Hacker News".
    pub source: String,
    pub author: String,
    pub score: i64,
    pub comments: u64,
    /// Human-readable age, e.g. "3 hours".
    pub age: String,
    /// Submission time, RFC 3339.
    pub created_at: Option<String>,
    /// Absolute link to the discussion page.
    pub discussion_url: String,
    /// The submitted link.
    pub link: Option<String>,
    pub backend: Backend,
}

/// Per-backend status.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BackendStatus {
    /// One of "disabled", "succeeded", "failed".
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
}

impl From<&BackendOutcome> for BackendStatus {
    fn from(outcome: &BackendOutcome) -> Self {
        match outcome {
            BackendOutcome::Disabled => {
                Self { status: "disabled".into(), count: None, reason: None, attempts: None }
            }
            BackendOutcome::Succeeded { count } => {
                Self { status: "succeeded".into(), count: Some(*count), reason: None, attempts: None }
            }
            BackendOutcome::Failed { reason, attempts } => Self {
                status: "failed".into(),
                count: None,
                reason: Some(reason.clone()),
                attempts: Some(*attempts),
            },
        }
    }
}

/// Output structure for find_discussions tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FindDiscussionsOutput {
    /// The normalized query sent to Reddit.
    pub query: String,
    /// The URL was recognized as a video and searched by id.
    pub is_special_media: bool,
    pub discussions: Vec<Discussion>,
    pub reddit: BackendStatus,
    pub hackernews: BackendStatus,
    /// Reddit results cached under the other match mode, if any.
    pub sibling_count: Option<usize>,
}

fn to_discussion(submission: Submission, old_frontend: bool, now: i64) -> Discussion {
    Discussion {
        discussion_url: submission.discussion_url(old_frontend),
        age: relative_age(submission.created_at, now),
        created_at: chrono::DateTime::from_timestamp(submission.created_at, 0).map(|t| t.to_rfc3339()),
        title: submission.title,
        source: submission.source_label,
        author: submission.author,
        score: submission.score,
        comments: submission.comment_count,
        link: submission.url,
        backend: submission.backend,
    }
}

/// Implementation of the find_discussions tool.
pub async fn find_impl(state: &AppState, params: FindDiscussionsParams) -> Result<CallToolResult, McpError> {
    let url = params.url.trim();
    if url.is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()).into());
    }

    let policy = state.policies.load().await?;
    let mut aggregate = state.aggregator.lookup(url, &policy, !params.force_refresh).await;

    if aggregate.all_failed() {
        let reasons: Vec<String> = [("reddit", &aggregate.reddit), ("hackernews", &aggregate.hackernews)]
            .into_iter()
            .filter_map(|(name, outcome)| match outcome {
                BackendOutcome::Failed { reason, .. } => Some(format!("{name}: {reason}")),
                _ => None,
            })
            .collect();
        return Err(Error::BackendFailed(reasons.join("; ")).into());
    }

    sort_submissions(&mut aggregate.submissions, policy.results.order_by, policy.results.desc);

    let now = now_millis();
    let output = FindDiscussionsOutput {
        query: aggregate.query.canonical.clone(),
        is_special_media: aggregate.query.is_special_media,
        reddit: BackendStatus::from(&aggregate.reddit),
        hackernews: BackendStatus::from(&aggregate.hackernews),
        sibling_count: aggregate.sibling_count,
        discussions: aggregate
            .submissions
            .into_iter()
            .map(|s| to_discussion(s, policy.results.old_frontend, now))
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
