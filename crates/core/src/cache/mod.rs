//! Key-value storage and the TTL cache built on it.
//!
//! Storage is split into two scopes:
//!
//! - `session`: volatile, process-lifetime; holds cached search results
//! - `synced`: durable; holds the user policy
//!
//! Staleness is a read-time predicate. Nothing here evicts individual
//! entries; only a full clear of a scope removes them.

pub mod connection;
pub mod migrations;
pub mod store;
pub mod ttl;

pub use crate::Error;

pub use connection::SqliteStore;
pub use store::{KvStore, MemoryStore, Scope, ScopedStore};
pub use ttl::{CacheEntry, CachePolicy, ModalEntry, TtlCache, now_millis};
