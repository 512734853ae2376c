//! Score persistence.
//!
//! The lifecycle hands each side's rounded total to a [`ScoreStore`] when a
//! match ends. The SQLite store keeps a running total per name.

use crate::config::DatabaseConfig;
use crate::error::StoreError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::info;

static MEMDB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Destination for end-of-match point totals.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Add `points` to the running total for `name`.
    async fn commit_score(&self, name: &str, points: i64) -> Result<(), StoreError>;
}

/// Store that discards every commit. Used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopScoreStore;

#[async_trait]
impl ScoreStore for NoopScoreStore {
    async fn commit_score(&self, _name: &str, _points: i64) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Store for the `[database]` section: SQLite when configured, otherwise
/// a store that discards commits.
pub async fn open_score_store(
    database: Option<&DatabaseConfig>,
) -> Result<Arc<dyn ScoreStore>, StoreError> {
    match database {
        Some(db) => Ok(Arc::new(SqliteScoreStore::connect(&db.path).await?)),
        None => {
            info!("No score database configured, scores will be discarded");
            Ok(Arc::new(NoopScoreStore))
        }
    }
}

/// SQLite-backed store.
#[derive(Clone)]
pub struct SqliteScoreStore {
    pool: SqlitePool,
}

impl SqliteScoreStore {
    const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Open (creating if needed) the score database at `path`.
    ///
    /// `:memory:` opens a private in-memory database.
    pub async fn connect(path: &str) -> Result<Self, StoreError> {
        let options = if path == ":memory:" {
            // Unique name per call so parallel tests never share a database.
            let id = MEMDB_COUNTER.fetch_add(1, Ordering::Relaxed);
            SqliteConnectOptions::new()
                .filename(format!(
                    "file:feedbot-scores-{}-{}?mode=memory&cache=shared",
                    std::process::id(),
                    id
                ))
                .shared_cache(true)
                .create_if_missing(true)
        } else {
            if let Some(parent) = Path::new(path).parent()
                && !parent.as_os_str().is_empty()
                && let Err(e) = std::fs::create_dir_all(parent)
            {
                tracing::warn!(path = %parent.display(), error = %e, "Failed to create database directory");
            }
            SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Self::ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS scores (
                name TEXT PRIMARY KEY NOT NULL,
                points INTEGER NOT NULL DEFAULT 0
            )",
        )
        .execute(&pool)
        .await?;

        info!(path = %path, "Score database connected");
        Ok(Self { pool })
    }

    /// Running total for `name`, if it has ever been committed.
    pub async fn total(&self, name: &str) -> Result<Option<i64>, StoreError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT points FROM scores WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(total)
    }
}

#[async_trait]
impl ScoreStore for SqliteScoreStore {
    async fn commit_score(&self, name: &str, points: i64) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO scores (name, points) VALUES (?, ?)
             ON CONFLICT(name) DO UPDATE SET points = points + excluded.points",
        )
        .bind(name)
        .bind(points)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_commit_accumulates() {
        let store = SqliteScoreStore::connect(":memory:").await.unwrap();
        assert_eq!(store.total("red").await.unwrap(), None);

        store.commit_score("red", 120).await.unwrap();
        store.commit_score("red", 15).await.unwrap();
        store.commit_score("blue", 0).await.unwrap();

        assert_eq!(store.total("red").await.unwrap(), Some(135));
        assert_eq!(store.total("blue").await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scores.db");
        let path = path.to_str().unwrap();

        SqliteScoreStore::connect(path)
            .await
            .unwrap()
            .commit_score("red", 7)
            .await
            .unwrap();

        let reopened = SqliteScoreStore::connect(path).await.unwrap();
        assert_eq!(reopened.total("red").await.unwrap(), Some(7));
    }

    #[tokio::test]
    async fn test_open_configured_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.db");
        let database = DatabaseConfig {
            path: path.to_str().unwrap().to_string(),
        };

        let store = open_score_store(Some(&database)).await.unwrap();
        store.commit_score("red", 42).await.unwrap();

        let reopened = SqliteScoreStore::connect(&database.path).await.unwrap();
        assert_eq!(reopened.total("red").await.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn test_open_without_database_discards() {
        let store = open_score_store(None).await.unwrap();
        store.commit_score("red", 42).await.unwrap();
    }
}
