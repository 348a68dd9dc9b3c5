//! Reddit listing types and mapping into [`Submission`].

use serde::Deserialize;
use tabthreads_core::{Backend, Submission};

/// A `Listing` envelope as returned by info, search and duplicates.
#[derive(Debug, Default, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub data: ListingData,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<Thing>,
}

/// A listing child; only links are requested so `data` is always a link.
#[derive(Debug, Deserialize)]
pub struct Thing {
    pub data: Link,
}

/// Raw link submission.
#[derive(Debug, Deserialize)]
pub struct Link {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: u64,
    /// Reddit reports this as a float.
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub permalink: String,
}

impl From<Link> for Submission {
    fn from(link: Link) -> Self {
        Submission {
            id: link.id,
            title: link.title,
            url: link.url,
            score: link.score,
            comment_count: link.num_comments,
            created_at: link.created_utc as i64,
            source_label: link.subreddit,
            author: link.author,
            permalink: link.permalink,
            backend: Backend::Reddit,
        }
    }
}

impl Listing {
    pub fn into_submissions(self) -> Vec<Submission> {
        self.data.children.into_iter().map(|thing| thing.data.into()).collect()
    }
}

/// The duplicates endpoint answers `[original, duplicates]`; only the second
/// listing is of interest.
pub fn duplicates_from(listings: Vec<Listing>) -> Vec<Submission> {
    listings.into_iter().nth(1).map(Listing::into_submissions).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_JSON: &str = r#"{
        "kind": "Listing",
        "data": {
            "children": [
                {
                    "kind": "t3",
                    "data": {
                        "id": "abc123",
                        "title": "An interesting article",
                        "url": "https://example.com/a",
                        "score": 421,
                        "num_comments": 87,
                        "created_utc": 1700000000.0,
                        "subreddit": "programming",
                        "author": "someone",
                        "permalink": "/r/programming/comments/abc123/an_interesting_article/"
                    }
                },
                {
                    "kind": "t3",
                    "data": {
                        "id": "def456",
                        "title": "Same link elsewhere",
                        "score": -2,
                        "created_utc": 1700000500.5,
                        "subreddit": "rust",
                        "author": "other",
                        "permalink": "/r/rust/comments/def456/same_link_elsewhere/"
                    }
                }
            ]
        }
    }"#;

    #[test]
    fn test_listing_into_submissions() {
        let listing: Listing = serde_json::from_str(LISTING_JSON).unwrap();
        let submissions = listing.into_submissions();

        assert_eq!(submissions.len(), 2);

        let first = &submissions[0];
        assert_eq!(first.id, "abc123");
        assert_eq!(first.comment_count, 87);
        assert_eq!(first.created_at, 1_700_000_000);
        assert_eq!(first.source_label, "programming");
        assert_eq!(first.backend, Backend::Reddit);

        let second = &submissions[1];
        assert_eq!(second.score, -2);
        assert_eq!(second.comment_count, 0);
        assert!(second.url.is_none());
    }

    #[test]
    fn test_empty_listing() {
        let listing: Listing = serde_json::from_str(r#"{"kind": "Listing", "data": {"children": []}}"#).unwrap();
        assert!(listing.into_submissions().is_empty());

        let listing: Listing = serde_json::from_str("{}").unwrap();
        assert!(listing.into_submissions().is_empty());
    }

    #[test]
    fn test_duplicates_takes_second_listing() {
        let original: Listing = serde_json::from_str(LISTING_JSON).unwrap();
        let dupes: Listing = serde_json::from_str(
            r#"{"data": {"children": [{"data": {"id": "zzz999", "subreddit": "news", "permalink": "/r/news/comments/zzz999/x/"}}]}}"#,
        )
        .unwrap();

        let found = duplicates_from(vec![original, dupes]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "zzz999");

        assert!(duplicates_from(vec![Listing::default()]).is_empty());
        assert!(duplicates_from(Vec::new()).is_empty());
    }
}
