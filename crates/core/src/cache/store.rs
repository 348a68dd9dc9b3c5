//! Scoped key-value store abstraction.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::Error;

/// Storage scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Volatile cache; never assumed to survive a restart.
    Session,
    /// Durable settings.
    Synced,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Session => "session",
            Scope::Synced => "synced",
        }
    }
}

/// A get/set/clear key-value store with two scopes.
///
/// Writes are last-write-wins per key; there is no compare-and-swap.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, scope: Scope, key: &str) -> Result<Option<Value>, Error>;

    async fn set(&self, scope: Scope, key: &str, value: Value) -> Result<(), Error>;

    /// Remove every key in `scope`.
    async fn clear(&self, scope: Scope) -> Result<(), Error>;
}

/// In-memory store.
///
/// Uses a HashMap behind a tokio RwLock for concurrent access.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<(Scope, String), Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys held in `scope`.
    pub async fn len(&self, scope: Scope) -> usize {
        self.entries.read().await.keys().filter(|(s, _)| *s == scope).count()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, scope: Scope, key: &str) -> Result<Option<Value>, Error> {
        let entries = self.entries.read().await;
        Ok(entries.get(&(scope, key.to_string())).cloned())
    }

    async fn set(&self, scope: Scope, key: &str, value: Value) -> Result<(), Error> {
        let mut entries = self.entries.write().await;
        entries.insert((scope, key.to_string()), value);
        Ok(())
    }

    async fn clear(&self, scope: Scope) -> Result<(), Error> {
        let mut entries = self.entries.write().await;
        entries.retain(|(s, _), _| *s != scope);
        Ok(())
    }
}

/// Routes each scope to its own backing store.
#[derive(Clone)]
pub struct ScopedStore {
    session: Arc<dyn KvStore>,
    synced: Arc<dyn KvStore>,
}

impl ScopedStore {
    pub fn new(session: Arc<dyn KvStore>, synced: Arc<dyn KvStore>) -> Self {
        Self { session, synced }
    }

    fn route(&self, scope: Scope) -> &Arc<dyn KvStore> {
        match scope {
            Scope::Session => &self.session,
            Scope::Synced => &self.synced,
        }
    }
}

#[async_trait]
impl KvStore for ScopedStore {
    async fn get(&self, scope: Scope, key: &str) -> Result<Option<Value>, Error> {
        self.route(scope).get(scope, key).await
    }

    async fn set(&self, scope: Scope, key: &str, value: Value) -> Result<(), Error> {
        self.route(scope).set(scope, key, value).await
    }

    async fn clear(&self, scope: Scope) -> Result<(), Error> {
        self.route(scope).clear(scope).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_store_scopes_are_isolated() {
        let store = MemoryStore::new();
        store.set(Scope::Session, "k", json!(1)).await.unwrap();
        store.set(Scope::Synced, "k", json!(2)).await.unwrap();

        assert_eq!(store.get(Scope::Session, "k").await.unwrap(), Some(json!(1)));
        assert_eq!(store.get(Scope::Synced, "k").await.unwrap(), Some(json!(2)));

        store.clear(Scope::Session).await.unwrap();
        assert!(store.get(Scope::Session, "k").await.unwrap().is_none());
        assert_eq!(store.get(Scope::Synced, "k").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_memory_store_last_write_wins() {
        let store = MemoryStore::new();
        store.set(Scope::Session, "k", json!("old")).await.unwrap();
        store.set(Scope::Session, "k", json!("new")).await.unwrap();
        assert_eq!(store.get(Scope::Session, "k").await.unwrap(), Some(json!("new")));
        assert_eq!(store.len(Scope::Session).await, 1);
    }

    #[tokio::test]
    async fn test_scoped_store_routes() {
        let session = Arc::new(MemoryStore::new());
        let synced = Arc::new(MemoryStore::new());
        let store = ScopedStore::new(session.clone(), synced.clone());

        store.set(Scope::Session, "a", json!(true)).await.unwrap();
        store.set(Scope::Synced, "b", json!(false)).await.unwrap();

        assert_eq!(session.len(Scope::Session).await, 1);
        assert_eq!(synced.len(Scope::Synced).await, 1);
        assert_eq!(session.len(Scope::Synced).await, 0);
    }
}
