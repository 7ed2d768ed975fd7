//! The book repository.
//!
//! Translates the four domain operations into parameterized statements against the store and
//! decodes rows back into [`Book`] values. "No matching row" is reported as
//! [`RepositoryError::NotFound`], separate from any underlying store failure, because callers map
//! the two to different responses.

use crate::domain::book::{creation_timestamp, format_timestamp, parse_timestamp};
use crate::domain::{Book, CreateBookRequest};
use crate::storage::SqliteStore;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use thiserror::Error;

const SELECT_COLUMNS: &str = "SELECT id, title, author, price, created_at FROM books";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("book {id} not found")]
    NotFound { id: i64 },

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("book {id} has an unreadable created_at value `{value}`: {source}")]
    CorruptTimestamp {
        id: i64,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }
}

/// Contract for book persistence. Handlers depend on this trait, not on SQLite.
///
/// Implementations must be safe to share across request tasks; they hold no mutable state of
/// their own beyond the store.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Inserts an already-validated request and returns the fully populated book.
    async fn create(&self, request: &CreateBookRequest) -> Result<Book, RepositoryError>;

    /// Every stored book in ascending `id` order. An empty store yields an empty vector.
    async fn all(&self) -> Result<Vec<Book>, RepositoryError>;

    async fn find_by_id(&self, id: i64) -> Result<Book, RepositoryError>;

    /// Fails with `NotFound` when the statement affected no rows.
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
}

/// [`BookRepository`] backed by the embedded SQLite store.
#[derive(Clone, Debug)]
pub struct SqliteBookRepository {
    store: SqliteStore,
}

impl SqliteBookRepository {
    pub fn new(store: SqliteStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
    async fn create(&self, request: &CreateBookRequest) -> Result<Book, RepositoryError> {
        let created_at = creation_timestamp();
        let result = sqlx::query(
            "INSERT INTO books (title, author, price, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&request.title)
        .bind(&request.author)
        .bind(request.price)
        .bind(format_timestamp(&created_at))
        .execute(self.store.pool())
        .await?;

        Ok(Book {
            id: result.last_insert_rowid(),
            title: request.title.clone(),
            author: request.author.clone(),
            price: request.price,
            created_at,
        })
    }

    async fn all(&self) -> Result<Vec<Book>, RepositoryError> {
        let rows = sqlx::query(&format!("{SELECT_COLUMNS} ORDER BY id ASC"))
            .fetch_all(self.store.pool())
            .await?;
        rows.iter().map(book_from_row).collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Book, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.store.pool())
            .await?;
        match row {
            Some(row) => book_from_row(&row),
            None => Err(RepositoryError::NotFound { id }),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(self.store.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound { id });
        }
        Ok(())
    }
}

fn book_from_row(row: &SqliteRow) -> Result<Book, RepositoryError> {
    let id: i64 = row.try_get("id")?;
    let raw_created_at: String = row.try_get("created_at")?;
    let created_at =
        parse_timestamp(&raw_created_at).map_err(|source| RepositoryError::CorruptTimestamp {
            id,
            value: raw_created_at.clone(),
            source,
        })?;

    Ok(Book {
        id,
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        price: row.try_get("price")?,
        created_at,
    })
}
