//! TTL cache over the session scope.
//!
//! Entries carry the time they were stored; validity is checked against a
//! caller-supplied TTL at read time. A stale entry stays readable until the
//! scope is cleared.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::store::{KvStore, MemoryStore, Scope};
use crate::Error;
use crate::model::MatchMode;

/// Current wall-clock time in unix milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A timestamped payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub payload: T,
    /// Unix milliseconds.
    pub stored_at: i64,
}

impl<T> CacheEntry<T> {
    pub fn new(payload: T) -> Self {
        Self { payload, stored_at: now_millis() }
    }

    /// Whether the entry is younger than `ttl_minutes` right now.
    pub fn is_valid(&self, ttl_minutes: u32) -> bool {
        self.is_valid_at(ttl_minutes, now_millis())
    }

    /// Whether the entry is younger than `ttl_minutes` at `now` (unix ms).
    pub fn is_valid_at(&self, ttl_minutes: u32, now: i64) -> bool {
        now - self.stored_at < i64::from(ttl_minutes) * 60_000
    }
}

/// One slot per match mode, stored together under a single query key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModalEntry<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact: Option<CacheEntry<T>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy: Option<CacheEntry<T>>,
}

impl<T> Default for ModalEntry<T> {
    fn default() -> Self {
        Self { exact: None, fuzzy: None }
    }
}

impl<T> ModalEntry<T> {
    pub fn slot(&self, mode: MatchMode) -> Option<&CacheEntry<T>> {
        match mode {
            MatchMode::Exact => self.exact.as_ref(),
            MatchMode::Fuzzy => self.fuzzy.as_ref(),
        }
    }

    fn slot_mut(&mut self, mode: MatchMode) -> &mut Option<CacheEntry<T>> {
        match mode {
            MatchMode::Exact => &mut self.exact,
            MatchMode::Fuzzy => &mut self.fuzzy,
        }
    }
}

/// How a client may use the cache for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Serve valid cached entries without a network call.
    pub use_cache: bool,
    pub ttl_minutes: u32,
}

impl CachePolicy {
    pub fn new(use_cache: bool, ttl_minutes: u32) -> Self {
        Self { use_cache, ttl_minutes }
    }
}

/// Read-through TTL cache stored in the session scope.
#[derive(Clone)]
pub struct TtlCache {
    store: Arc<dyn KvStore>,
}

impl TtlCache {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// A cache backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Read the entry under `key`, stale or not.
    ///
    /// A value that no longer decodes as `T` reads as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<CacheEntry<T>>, Error> {
        self.read(key).await
    }

    /// Store `payload` under `key`, stamped with the current time.
    pub async fn put<T: Serialize>(&self, key: &str, payload: &T) -> Result<(), Error> {
        self.put_entry(key, &CacheEntry { payload, stored_at: now_millis() }).await
    }

    /// Store a pre-built entry, keeping its timestamp.
    pub async fn put_entry<T: Serialize>(&self, key: &str, entry: &CacheEntry<T>) -> Result<(), Error> {
        let value = serde_json::to_value(entry)?;
        self.store.set(Scope::Session, key, value).await
    }

    /// Read both mode slots stored under `key`.
    pub async fn get_modal<T: DeserializeOwned>(&self, key: &str) -> Result<Option<ModalEntry<T>>, Error> {
        self.read(key).await
    }

    /// Replace the `mode` slot under `key`, keeping the other slot.
    pub async fn put_mode<T>(&self, key: &str, mode: MatchMode, payload: T) -> Result<(), Error>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut entry: ModalEntry<T> = self.get_modal(key).await?.unwrap_or_default();
        *entry.slot_mut(mode) = Some(CacheEntry::new(payload));
        let value = serde_json::to_value(&entry)?;
        self.store.set(Scope::Session, key, value).await
    }

    /// Drop every cached entry.
    pub async fn clear(&self) -> Result<(), Error> {
        self.store.clear(Scope::Session).await
    }

    async fn read<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>, Error> {
        let Some(value) = self.store.get(Scope::Session, key).await? else {
            return Ok(None);
        };

        match serde_json::from_value(value) {
            Ok(decoded) => Ok(Some(decoded)),
            Err(e) => {
                tracing::debug!(key, error = %e, "discarding undecodable cache value");
                Ok(None)
            }
        }
    }
}
