pub mod handlers;
pub mod models;
pub mod store;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use shelf_kernel::{InitCtx, Migration, Module};

use handlers::SharedAuthorStore;

pub const MODULE_NAME: &str = "authors";

pub fn migrations() -> Vec<Migration> {
    vec![Migration {
        id: "001_init",
        up: r#"
            CREATE TABLE IF NOT EXISTS authors (
                id         BIGSERIAL PRIMARY KEY,
                name       TEXT NOT NULL CHECK (btrim(name) <> ''),
                bio        TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp()
            );
            "#,
        down: "DROP TABLE IF EXISTS authors;",
    }]
}

/// Authors module: CRUD over the `authors` table
pub struct AuthorsModule {
    store: SharedAuthorStore,
}

impl AuthorsModule {
    pub fn new(store: SharedAuthorStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        handlers::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let author_ref = serde_json::json!({ "$ref": "#/components/schemas/Author" });
        let error_ref = serde_json::json!({
            "description": "Error",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                }
            }
        });

        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List authors, newest first",
                        "tags": ["Authors"],
                        "parameters": [
                            { "name": "page", "in": "query", "schema": { "type": "integer", "minimum": 0 } },
                            { "name": "size", "in": "query", "schema": { "type": "integer", "minimum": 0 } }
                        ],
                        "responses": {
                            "200": {
                                "description": "List of authors",
                                "content": {
                                    "application/json": {
                                        "schema": { "type": "array", "items": author_ref.clone() }
                                    }
                                }
                            },
                            "400": error_ref.clone()
                        }
                    },
                    "post": {
                        "summary": "Create an author",
                        "tags": ["Authors"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/NewAuthor" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Created author",
                                "content": { "application/json": { "schema": author_ref.clone() } }
                            },
                            "400": error_ref.clone()
                        }
                    }
                },
                "/{id}": {
                    "parameters": [
                        { "name": "id", "in": "path", "required": true, "schema": { "type": "integer", "format": "int64" } }
                    ],
                    "get": {
                        "summary": "Get an author",
                        "tags": ["Authors"],
                        "responses": {
                            "200": {
                                "description": "The author",
                                "content": { "application/json": { "schema": author_ref } }
                            },
                            "404": error_ref.clone()
                        }
                    },
                    "delete": {
                        "summary": "Delete an author",
                        "tags": ["Authors"],
                        "responses": {
                            "204": { "description": "Deleted" },
                            "404": error_ref
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Author": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "name": { "type": "string" },
                            "bio": { "type": ["string", "null"] },
                            "created_at": { "type": "string", "format": "date-time" },
                            "updated_at": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "name", "created_at", "updated_at"]
                    },
                    "NewAuthor": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "bio": { "type": ["string", "null"] }
                        },
                        "required": ["name"]
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
            .with_context(|| "authors store unreachable")
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.store.close().await;
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}

pub fn create_module(store: SharedAuthorStore) -> Arc<dyn Module> {
    Arc::new(AuthorsModule::new(store))
}
