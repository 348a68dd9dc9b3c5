//! Duplicate-submission resolution.
//!
//! The same link is often submitted to several subreddits. After a primary
//! query, the first result's duplicates are fetched and merged in. The merge
//! keeps the first occurrence of every id, so the output never repeats one.

use std::collections::HashSet;

use tabthreads_core::Submission;

/// Outcome of duplicate resolution for one result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    /// Nothing to resolve (empty primary set or served from cache).
    Skipped,
    /// The duplicates lookup succeeded; `added` new submissions were merged.
    Applied { added: usize },
    /// The duplicates lookup failed; the primary set is unchanged.
    Failed { reason: String },
}

impl Enrichment {
    pub fn is_failed(&self) -> bool {
        matches!(self, Enrichment::Failed { .. })
    }
}

/// Merge `siblings` after `primary`, dropping any id already seen.
///
/// Returns the merged set and how many siblings were added.
pub fn splice_duplicates(primary: Vec<Submission>, siblings: Vec<Submission>) -> (Vec<Submission>, usize) {
    let mut seen = HashSet::new();
    let mut merged = Vec::with_capacity(primary.len() + siblings.len());

    for submission in primary {
        if seen.insert(submission.id.clone()) {
            merged.push(submission);
        }
    }
    let base = merged.len();

    for submission in siblings {
        if seen.insert(submission.id.clone()) {
            merged.push(submission);
        }
    }

    let added = merged.len() - base;
    (merged, added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabthreads_core::Backend;

    fn sub(id: &str) -> Submission {
        Submission {
            id: id.to_string(),
            title: format!("post {id}"),
            url: Some("https://example.com/a".into()),
            score: 1,
            comment_count: 0,
            created_at: 0,
            source_label: "test".into(),
            author: "a".into(),
            permalink: format!("/r/test/comments/{id}/"),
            backend: Backend::Reddit,
        }
    }

    fn ids(subs: &[Submission]) -> Vec<&str> {
        subs.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_splice_adds_only_new_ids() {
        let (merged, added) = splice_duplicates(vec![sub("a"), sub("b")], vec![sub("b"), sub("c"), sub("a")]);
        assert_eq!(ids(&merged), vec!["a", "b", "c"]);
        assert_eq!(added, 1);
    }

    #[test]
    fn test_splice_never_repeats_ids() {
        let (merged, added) = splice_duplicates(vec![sub("a"), sub("a")], vec![sub("c"), sub("c")]);
        assert_eq!(ids(&merged), vec!["a", "c"]);
        assert_eq!(added, 1);
    }

    #[test]
    fn test_splice_empty_inputs() {
        let (merged, added) = splice_duplicates(Vec::new(), Vec::new());
        assert!(merged.is_empty());
        assert_eq!(added, 0);

        let (merged, added) = splice_duplicates(vec![sub("a")], Vec::new());
        assert_eq!(ids(&merged), vec!["a"]);
        assert_eq!(added, 0);
    }

    #[test]
    fn test_enrichment_is_failed() {
        assert!(Enrichment::Failed { reason: "503".into() }.is_failed());
        assert!(!Enrichment::Applied { added: 2 }.is_failed());
        assert!(!Enrichment::Skipped.is_failed());
    }
}
