//! Reduction of an aggregate into one compact badge signal.

use serde::Serialize;
use tabthreads_core::config::BadgeContent;

use crate::aggregate::Aggregate;

/// Badge text shown when every enabled backend failed.
pub const ERROR_TEXT: &str = "X";

/// The two badge palette colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeColor {
    Success,
    Error,
}

impl BadgeColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeColor::Success => "success",
            BadgeColor::Error => "error",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            BadgeColor::Success => "#1f6feb",
            BadgeColor::Error => "#d1242f",
        }
    }
}

/// Terminal state of one trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Disabled, gated out, throttled or unresolvable; nothing ran.
    Skipped,
    /// The merged result set was empty.
    Empty,
    /// Badge set to this text.
    Success(String),
    /// Every enabled backend failed.
    Error,
}

impl RunOutcome {
    /// Text and color to write, if any.
    pub fn badge(&self) -> Option<(&str, BadgeColor)> {
        match self {
            RunOutcome::Skipped => None,
            RunOutcome::Empty => Some(("0", BadgeColor::Success)),
            RunOutcome::Success(text) => Some((text.as_str(), BadgeColor::Success)),
            RunOutcome::Error => Some((ERROR_TEXT, BadgeColor::Error)),
        }
    }
}

/// `950` -> `"950"`, `1500` -> `"1K+"`, `2_500_000` -> `"2M+"`.
pub fn format_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{}M+", count / 1_000_000)
    } else if count >= 1_000 {
        format!("{}K+", count / 1_000)
    } else {
        count.to_string()
    }
}

pub fn summarize(aggregate: &Aggregate, content: BadgeContent) -> RunOutcome {
    if aggregate.all_failed() {
        return RunOutcome::Error;
    }
    if aggregate.submissions.is_empty() {
        return RunOutcome::Empty;
    }

    let count = match content {
        BadgeContent::Submissions => aggregate.submissions.len() as u64,
        BadgeContent::Comments => aggregate.comment_total(),
    };
    RunOutcome::Success(format_count(count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::BackendOutcome;
    use crate::normalize::{NormalizeOptions, normalize};
    use tabthreads_core::{Backend, Submission};

    fn sub(id: &str, comments: u64) -> Submission {
        Submission {
            id: id.into(),
            title: id.into(),
            url: None,
            score: 0,
            comment_count: comments,
            created_at: 0,
            source_label: "test".into(),
            author: "a".into(),
            permalink: format!("/r/test/comments/{id}/"),
            backend: Backend::Reddit,
        }
    }

    fn aggregate(submissions: Vec<Submission>, reddit: BackendOutcome, hackernews: BackendOutcome) -> Aggregate {
        Aggregate {
            query: normalize("https://example.com/a", NormalizeOptions::default()),
            submissions,
            reddit,
            hackernews,
            sibling_count: None,
        }
    }

    fn failed() -> BackendOutcome {
        BackendOutcome::Failed { reason: "timeout".into(), attempts: 5 }
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(950), "950");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1K+");
        assert_eq!(format_count(1_500), "1K+");
        assert_eq!(format_count(12_345), "12K+");
        assert_eq!(format_count(999_999), "999K+");
        assert_eq!(format_count(2_500_000), "2M+");
    }

    #[test]
    fn test_summarize_counts() {
        let agg = aggregate(
            vec![sub("a", 700), sub("b", 900)],
            BackendOutcome::Succeeded { count: 2 },
            BackendOutcome::Succeeded { count: 0 },
        );
        assert_eq!(summarize(&agg, BadgeContent::Submissions), RunOutcome::Success("2".into()));
        assert_eq!(summarize(&agg, BadgeContent::Comments), RunOutcome::Success("1K+".into()));
    }

    #[test]
    fn test_all_failed_is_error_not_empty() {
        let agg = aggregate(Vec::new(), failed(), failed());
        assert_eq!(summarize(&agg, BadgeContent::Submissions), RunOutcome::Error);

        let agg = aggregate(Vec::new(), failed(), BackendOutcome::Disabled);
        assert_eq!(summarize(&agg, BadgeContent::Submissions), RunOutcome::Error);
    }

    #[test]
    fn test_partial_failure_is_success() {
        let agg = aggregate(vec![sub("a", 1)], BackendOutcome::Succeeded { count: 1 }, failed());
        assert_eq!(summarize(&agg, BadgeContent::Submissions), RunOutcome::Success("1".into()));
    }

    #[test]
    fn test_empty() {
        let agg =
            aggregate(Vec::new(), BackendOutcome::Succeeded { count: 0 }, BackendOutcome::Succeeded { count: 0 });
        let outcome = summarize(&agg, BadgeContent::Submissions);
        assert_eq!(outcome, RunOutcome::Empty);
        assert_eq!(outcome.badge(), Some(("0", BadgeColor::Success)));
        assert_eq!(RunOutcome::Error.badge(), Some(("X", BadgeColor::Error)));
        assert_eq!(RunOutcome::Skipped.badge(), None);
    }
}
