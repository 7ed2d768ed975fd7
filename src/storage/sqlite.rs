//! Embedded store implementation using SQLite.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const CREATE_BOOKS_TABLE: &str = "CREATE TABLE IF NOT EXISTS books (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    title      TEXT NOT NULL,
    author     TEXT NOT NULL,
    price      INTEGER NOT NULL,
    created_at TEXT NOT NULL
)";

/// File-backed databases get a small pool; SQLite serializes writers internally.
const FILE_POOL_SIZE: u32 = 5;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid database url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("database ping failed: {0}")]
    Ping(#[source] sqlx::Error),

    #[error("failed to create schema: {0}")]
    Schema(#[source] sqlx::Error),
}

/// Owns the connection pool for the lifetime of the process.
///
/// Cloning is cheap and shares the same pool; `close` releases it for every clone.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) the database at `url`, verifies it answers, and makes sure the
    /// `books` table exists.
    pub async fn open(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|source| StoreError::InvalidUrl {
                url: url.to_string(),
                source,
            })?
            .create_if_missing(true);

        let pool_options = if is_in_memory(url) {
            // An in-memory database disappears with its last connection, so pin exactly one.
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(FILE_POOL_SIZE)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(StoreError::Connect)?;

        let store = Self { pool };
        store.ping().await.map_err(StoreError::Ping)?;
        store.ensure_schema().await?;
        tracing::debug!(url, "store opened");
        Ok(store)
    }

    /// A private, empty database that lives as long as the returned store.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        Self::open("sqlite::memory:").await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_BOOKS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(StoreError::Schema)?;
        Ok(())
    }

    /// Waits for checked-out connections to return, then closes them. Calling it again is a no-op.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Like [`close`](Self::close), but gives up after `timeout` if connections are still
    /// checked out. Returns whether the release finished. The pool rejects new work either way.
    pub async fn close_within(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.close()).await.is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
