//! Core types and shared functionality for tabthreads.
//!
//! This crate provides:
//! - Key-value store abstraction with in-memory and SQLite backends
//! - TTL cache layered over the session scope
//! - Unified error types
//! - Configuration structures (process config and per-event policy)
//! - The canonical submission model shared by every backend

pub mod cache;
pub mod config;
pub mod error;
pub mod model;

pub use cache::{CacheEntry, CachePolicy, KvStore, MemoryStore, Scope, ScopedStore, SqliteStore, TtlCache};
pub use config::{AppConfig, AutoSearchConfig, ConfigError, PolicyStore};
pub use error::Error;
pub use model::{Backend, MatchMode, SearchResult, SortKey, Submission};
