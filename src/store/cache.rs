//! SQLite-backed local mirror of remote state.
//!
//! A single `cache(key, value, updated_at)` table holding JSON text (or raw
//! strings for the session id). Last writer wins per key.

use std::path::Path;

use serde::de::DeserializeOwned;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::debug;

use super::StoreError;

const SCHEMA: &str = include_str!("../../migrations/001_cache.sql");

/// Key/value cache over a SQLite pool.
#[derive(Debug, Clone)]
pub struct LocalCache {
    pool: SqlitePool,
}

impl LocalCache {
    /// Open (creating if needed) the cache database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the file cannot be opened or the
    /// schema cannot be applied.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Database(sqlx::Error::Io(e)))?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .pragma("trusted_schema", "OFF");

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        debug!(path = %path.display(), "local cache opened");
        Self::from_pool(pool).await
    }

    /// Open a private in-memory cache (nothing survives the process).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on SQLite failure.
    pub async fn in_memory() -> Result<Self, StoreError> {
        // One connection that never idles out; every new connection would
        // otherwise see its own empty database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, applying the schema.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the schema cannot be applied.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Raw stored text for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on SQLite failure.
    pub async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM cache WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    /// Stored value for `key`, decoded from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Malformed`] if the stored text is not valid JSON
    /// for `T`, or [`StoreError::Database`] on SQLite failure.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get(key).await? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Insert or replace the text stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on SQLite failure.
    pub async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO cache (key, value, updated_at) VALUES (?1, ?2, datetime('now')) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Delete `key` if present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on SQLite failure.
    pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM cache WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Every `(key, value)` whose key starts with `prefix`, ordered by key.
    ///
    /// Matching is literal; `%` and `_` in the prefix carry no meaning.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on SQLite failure.
    pub async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT key, value FROM cache WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Close the pool, flushing WAL state.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
