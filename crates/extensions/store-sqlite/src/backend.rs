//! SQLite key-value store implementation.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use std::path::Path;
use tokio_rusqlite::Connection;
use tracing::debug;

use pagepilot_protocols::error::StoreError;
use pagepilot_protocols::store::KeyValueStore;

use crate::schema::init_schema;

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;

/// SQLite-based key-value store. Values are stored as JSON text.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new in-memory database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

        conn.call(|conn| Ok(init_schema(conn)?))
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;

        Ok(Self { conn })
    }

    /// Open (or create) a file-backed database.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::StorageError(e.to_string()))?;
        }
        debug!(path = %path.display(), "Opening SQLite store");
        let conn = Connection::open(path)
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

        conn.call(|conn| Ok(init_schema(conn)?))
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;

        Ok(Self { conn })
    }

    /// Number of stored keys.
    pub async fn len(&self) -> Result<usize, StoreError> {
        self.conn
            .call(|conn| {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))?;
                Ok(count as usize)
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    fn id(&self) -> &str {
        "sqlite"
    }

    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let key = key.to_string();
        let raw: Option<String> = self
            .conn
            .call(move |conn| {
                let value = conn
                    .query_row("SELECT value FROM kv WHERE key = ?1", [&key], |row| {
                        row.get(0)
                    })
                    .optional()?;
                Ok(value)
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;

        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        let key = key.to_string();
        let text = serde_json::to_string(&value)?;
        let now = Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                    params![key, text, now],
                )?;
                Ok(())
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), StoreError> {
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                for key in &keys {
                    tx.execute("DELETE FROM kv WHERE key = ?1", [key])?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.conn
            .call(|conn| {
                conn.execute("DELETE FROM kv", [])?;
                Ok(())
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))
    }
}
