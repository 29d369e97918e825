pub mod handlers;
pub mod models;
pub mod store;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use shelf_kernel::{InitCtx, Migration, Module};

use handlers::SharedBookStore;

pub const MODULE_NAME: &str = "books";

/// Schema for the `books` table
pub fn migrations() -> Vec<Migration> {
    vec![Migration {
        id: "001_init",
        up: r#"
            CREATE TABLE IF NOT EXISTS books (
                id             BIGSERIAL PRIMARY KEY,
                title          TEXT NOT NULL CHECK (btrim(title) <> ''),
                published_date TIMESTAMPTZ NOT NULL,
                description    TEXT,
                created_at     TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp(),
                updated_at     TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp()
            );
            "#,
        down: "DROP TABLE IF EXISTS books;",
    }]
}

fn error_response(description: &str) -> serde_json::Value {
    serde_json::json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

/// Books module: CRUD over the `books` table
pub struct BooksModule {
    store: SharedBookStore,
}

impl BooksModule {
    pub fn new(store: SharedBookStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        handlers::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books, newest first",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "page",
                                "in": "query",
                                "required": false,
                                "description": "1-indexed page; 0 or absent disables paging",
                                "schema": { "type": "integer", "minimum": 0 }
                            },
                            {
                                "name": "size",
                                "in": "query",
                                "required": false,
                                "description": "Page length; 0 or absent disables paging",
                                "schema": { "type": "integer", "minimum": 0 }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "List of books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "400": error_response("Invalid paging parameters")
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/NewBook" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Created book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "400": error_response("Invalid book"),
                            "500": error_response("Internal server error")
                        }
                    }
                },
                "/{id}": {
                    "parameters": [
                        {
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "integer", "format": "int64" }
                        }
                    ],
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "404": error_response("Book not found")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "responses": {
                            "204": { "description": "Deleted" },
                            "404": error_response("Book not found")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "title": { "type": "string" },
                            "published_date": { "type": "string", "format": "date-time" },
                            "description": { "type": ["string", "null"] },
                            "created_at": { "type": "string", "format": "date-time" },
                            "updated_at": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "title", "published_date", "created_at", "updated_at"]
                    },
                    "NewBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "published_date": { "type": "string", "format": "date-time" },
                            "description": { "type": ["string", "null"] }
                        },
                        "required": ["title", "published_date"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        migrations()
    }

    async fn ready(&self) -> anyhow::Result<()> {
        self.store
            .ping()
            .await
            .with_context(|| "books store unreachable")
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.store.close().await;
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create the books module over the given store
pub fn create_module(store: SharedBookStore) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::memory::MemoryBookStore;

    #[tokio::test]
    async fn ready_follows_store_ping() {
        let store = Arc::new(MemoryBookStore::default());
        let module = BooksModule::new(store.clone());
        module.ready().await.unwrap();

        store.disconnect();
        let err = module.ready().await.unwrap_err();
        assert!(format!("{:#}", err).starts_with("books store unreachable"));
    }

    #[test]
    fn migration_is_reversible() {
        let migrations = migrations();
        assert_eq!(migrations.len(), 1);
        assert!(migrations[0].up.contains("CREATE TABLE IF NOT EXISTS books"));
        assert!(migrations[0].down.contains("DROP TABLE IF EXISTS books"));
    }
}
