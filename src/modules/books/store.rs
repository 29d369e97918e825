//! Book persistence.
//!
//! [`BookStore`] is the only way handlers reach the `books` table. Each call is
//! one statement under the configured deadline; nothing is cached or retried.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shelf_db::{bounded, Pagination, PgPool, StoreError, StoreResult};
use sqlx::FromRow;

use super::models::{Book, NewBook};

const RESOURCE: &str = "book";

#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a book; the returned record carries its id and timestamps.
    async fn create(&self, book: NewBook) -> StoreResult<Book>;

    async fn get(&self, id: i64) -> StoreResult<Book>;

    /// Newest first. See [`Pagination`] for how the window is chosen.
    async fn list(&self, page: Pagination) -> StoreResult<Vec<Book>>;

    /// Hard delete. Fails with `NotFound` if the id does not exist.
    async fn delete(&self, id: i64) -> StoreResult<()>;

    async fn ping(&self) -> StoreResult<()>;

    /// Release the database handle. Call once, at shutdown.
    async fn close(&self);
}

#[derive(Debug, FromRow)]
struct BookRow {
    id: i64,
    title: String,
    published_date: DateTime<Utc>,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            published_date: row.published_date,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL-backed book store
#[derive(Clone)]
pub struct PgBookStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgBookStore {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn create(&self, book: NewBook) -> StoreResult<Book> {
        book.validate()?;

        bounded("books.create", self.query_timeout, async {
            let row: BookRow = sqlx::query_as(
                r#"
                INSERT INTO books (title, published_date, description)
                VALUES ($1, $2, $3)
                RETURNING id, title, published_date, description, created_at, updated_at
                "#,
            )
            .bind(&book.title)
            .bind(book.published_date)
            .bind(book.description.as_deref())
            .fetch_one(&self.pool)
            .await?;

            Ok::<_, StoreError>(row.into())
        })
        .await
    }

    async fn get(&self, id: i64) -> StoreResult<Book> {
        bounded("books.get", self.query_timeout, async {
            let row: BookRow = sqlx::query_as(
                r#"
                SELECT id, title, published_date, description, created_at, updated_at
                FROM books
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(RESOURCE, id))?;

            Ok::<_, StoreError>(row.into())
        })
        .await
    }

    async fn list(&self, page: Pagination) -> StoreResult<Vec<Book>> {
        bounded("books.list", self.query_timeout, async {
            // LIMIT NULL is no limit, so one statement covers paged and unpaged
            let rows: Vec<BookRow> = sqlx::query_as(
                r#"
                SELECT id, title, published_date, description, created_at, updated_at
                FROM books
                ORDER BY created_at DESC, id DESC
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

            Ok::<_, StoreError>(rows.into_iter().map(Book::from).collect())
        })
        .await
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        bounded("books.delete", self.query_timeout, async {
            let result = sqlx::query("DELETE FROM books WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;

            if result.rows_affected() == 0 {
                return Err(StoreError::not_found(RESOURCE, id));
            }

            Ok::<_, StoreError>(())
        })
        .await
    }

    async fn ping(&self) -> StoreResult<()> {
        bounded("books.ping", self.query_timeout, async {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok::<_, StoreError>(())
        })
        .await
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
