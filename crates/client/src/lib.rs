//! Discussion lookup engine for tabthreads.
//!
//! This crate provides URL normalization, the Reddit and Hacker News
//! clients, the aggregator that fans out to both with retry, and the
//! auto-search controller that turns tab events into badge updates.

pub mod aggregate;
pub mod autosearch;
pub mod error;
pub mod hn;
pub mod http;
pub mod normalize;
pub mod reddit;

pub use aggregate::{Aggregate, Aggregator, BackendOutcome};
pub use autosearch::{BadgeBoard, BadgeColor, BadgeState, Controller, RunOutcome, SurfaceRegistry, Trigger};
pub use error::BackendError;
pub use hn::HnClient;
pub use http::{HttpConfig, JsonClient};
pub use normalize::{NormalizeOptions, NormalizedQuery, normalize};
pub use reddit::{Enrichment, RedditClient, RedditConfig};
