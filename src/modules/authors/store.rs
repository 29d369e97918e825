//! Author persistence over the `authors` table.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shelf_db::{bounded, Pagination, PgPool, StoreError, StoreResult};
use sqlx::FromRow;

use super::models::{Author, NewAuthor};

const RESOURCE: &str = "author";

#[async_trait]
pub trait AuthorStore: Send + Sync {
    async fn create(&self, author: NewAuthor) -> StoreResult<Author>;
    async fn get(&self, id: i64) -> StoreResult<Author>;
    async fn list(&self, page: Pagination) -> StoreResult<Vec<Author>>;
    async fn delete(&self, id: i64) -> StoreResult<()>;
    async fn ping(&self) -> StoreResult<()>;
    async fn close(&self);
}

#[derive(Debug, FromRow)]
struct AuthorRow {
    id: i64,
    name: String,
    bio: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AuthorRow> for Author {
    fn from(row: AuthorRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            bio: row.bio,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct PgAuthorStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgAuthorStore {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }
}

#[async_trait]
impl AuthorStore for PgAuthorStore {
    async fn create(&self, author: NewAuthor) -> StoreResult<Author> {
        author.validate()?;

        bounded("authors.create", self.query_timeout, async {
            let row: AuthorRow = sqlx::query_as(
                r#"
                INSERT INTO authors (name, bio)
                VALUES ($1, $2)
                RETURNING id, name, bio, created_at, updated_at
                "#,
            )
            .bind(&author.name)
            .bind(author.bio.as_deref())
            .fetch_one(&self.pool)
            .await?;

            Ok::<_, StoreError>(row.into())
        })
        .await
    }

    async fn get(&self, id: i64) -> StoreResult<Author> {
        bounded("authors.get", self.query_timeout, async {
            sqlx::query_as::<_, AuthorRow>(
                "SELECT id, name, bio, created_at, updated_at FROM authors WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Author::from)
            .ok_or_else(|| StoreError::not_found(RESOURCE, id))
        })
        .await
    }

    async fn list(&self, page: Pagination) -> StoreResult<Vec<Author>> {
        bounded("authors.list", self.query_timeout, async {
            let rows: Vec<AuthorRow> = sqlx::query_as(
                r#"
                SELECT id, name, bio, created_at, updated_at
                FROM authors
                ORDER BY created_at DESC, id DESC
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

            Ok::<_, StoreError>(rows.into_iter().map(Author::from).collect())
        })
        .await
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        bounded("authors.delete", self.query_timeout, async {
            let deleted = sqlx::query("DELETE FROM authors WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?
                .rows_affected();

            match deleted {
                0 => Err(StoreError::not_found(RESOURCE, id)),
                _ => Ok(()),
            }
        })
        .await
    }

    async fn ping(&self) -> StoreResult<()> {
        bounded("authors.ping", self.query_timeout, async {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok::<_, StoreError>(())
        })
        .await
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use crate::modules::testing::MemoryTable;

    #[derive(Default)]
    pub struct MemoryAuthorStore {
        table: MemoryTable<Author>,
    }

    #[async_trait]
    impl AuthorStore for MemoryAuthorStore {
        async fn create(&self, author: NewAuthor) -> StoreResult<Author> {
            author.validate()?;
            Ok(self.table.insert(|id, now| Author {
                id,
                name: author.name,
                bio: author.bio,
                created_at: now,
                updated_at: now,
            }))
        }

        async fn get(&self, id: i64) -> StoreResult<Author> {
            self.table
                .get(id)
                .ok_or_else(|| StoreError::not_found(RESOURCE, id))
        }

        async fn list(&self, page: Pagination) -> StoreResult<Vec<Author>> {
            Ok(self.table.list(page))
        }

        async fn delete(&self, id: i64) -> StoreResult<()> {
            if self.table.remove(id) {
                Ok(())
            } else {
                Err(StoreError::not_found(RESOURCE, id))
            }
        }

        async fn ping(&self) -> StoreResult<()> {
            self.table.ping()
        }

        async fn close(&self) {
            self.table.disconnect();
        }
    }
}
