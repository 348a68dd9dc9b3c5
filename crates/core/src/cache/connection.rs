//! SQLite-backed key-value store.
//!
//! This module handles opening the SQLite database, applying required pragmas
//! for performance and concurrency (WAL mode), and running migrations.

use super::migrations;
use super::store::{KvStore, Scope};
use crate::Error;
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use tokio_rusqlite::{Connection, params, rusqlite};

const PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA temp_store=MEMORY;
     PRAGMA foreign_keys=ON;";

/// Durable key-value store.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pub(crate) conn: Connection,
}

impl SqliteStore {
    /// Open a store at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies performance pragmas,
    /// and runs any pending migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open(path).await.map_err(|e| Error::Store(e.into()))?;
        Self::init(conn).await
    }

    /// Open an in-memory store for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Store(e.into()))?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, Error> {
        conn.call(|conn| {
            conn.execute_batch(PRAGMAS)?;
            Ok(())
        })
        .await
        .map_err(Error::Store)?;

        migrations::run(&conn).await?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl KvStore for SqliteStore {
    async fn get(&self, scope: Scope, key: &str) -> Result<Option<Value>, Error> {
        let key = key.to_string();
        let raw = self
            .conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let mut stmt = conn.prepare("SELECT value_json FROM kv_store WHERE scope = ?1 AND key = ?2")?;

                match stmt.query_row(params![scope.as_str(), key], |row| row.get(0)) {
                    Ok(json) => Ok(Some(json)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        raw.map(|json| serde_json::from_str(&json).map_err(Error::from))
            .transpose()
    }

    async fn set(&self, scope: Scope, key: &str, value: Value) -> Result<(), Error> {
        let key = key.to_string();
        let value_json = serde_json::to_string(&value)?;
        let updated_at = chrono::Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO kv_store (scope, key, value_json, updated_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(scope, key) DO UPDATE SET
                        value_json = excluded.value_json,
                        updated_at = excluded.updated_at",
                    params![scope.as_str(), key, value_json, updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn clear(&self, scope: Scope) -> Result<(), Error> {
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let count = conn.execute("DELETE FROM kv_store WHERE scope = ?1", params![scope.as_str()])?;
                tracing::debug!(scope = scope.as_str(), deleted = count, "cleared store scope");
                Ok(())
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_open_in_memory() {
        let db = SqliteStore::open_in_memory().await.unwrap();
        let version = db
            .conn
            .call(|conn| conn.query_row("SELECT sqlite_version()", [], |row| row.get::<_, String>(0)))
            .await
            .unwrap();
        assert!(!version.is_empty());
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let db = SqliteStore::open_in_memory().await.unwrap();
        let value = json!({"cache": {"period_minutes": 30}});

        db.set(Scope::Synced, "options", value.clone()).await.unwrap();

        let retrieved = db.get(Scope::Synced, "options").await.unwrap();
        assert_eq!(retrieved, Some(value));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let db = SqliteStore::open_in_memory().await.unwrap();
        assert!(db.get(Scope::Synced, "nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert() {
        let db = SqliteStore::open_in_memory().await.unwrap();
        db.set(Scope::Session, "k", json!({"old": 1})).await.unwrap();
        db.set(Scope::Session, "k", json!({"new": 2})).await.unwrap();

        let retrieved = db.get(Scope::Session, "k").await.unwrap().unwrap();
        assert_eq!(retrieved, json!({"new": 2}));
    }

    #[tokio::test]
    async fn test_clear_only_touches_scope() {
        let db = SqliteStore::open_in_memory().await.unwrap();
        db.set(Scope::Session, "k", json!(1)).await.unwrap();
        db.set(Scope::Synced, "k", json!(2)).await.unwrap();

        db.clear(Scope::Session).await.unwrap();

        assert!(db.get(Scope::Session, "k").await.unwrap().is_none());
        assert_eq!(db.get(Scope::Synced, "k").await.unwrap(), Some(json!(2)));
    }
}
