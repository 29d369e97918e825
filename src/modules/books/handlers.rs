//! HTTP handlers for `/api/books`.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shelf_db::Pagination;
use shelf_http::error::AppError;

use super::models::{Book, NewBook};
use super::store::BookStore;

pub type SharedBookStore = Arc<dyn BookStore>;

pub fn router(store: SharedBookStore) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/{id}", get(get_book).delete(delete_book))
        .with_state(store)
}

/// GET /api/books?page=&size=
async fn list_books(
    State(store): State<SharedBookStore>,
    page: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<Book>>, AppError> {
    let Query(page) = page?;
    Ok(Json(store.list(page).await?))
}

/// POST /api/books
async fn create_book(
    State(store): State<SharedBookStore>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let Json(book) = payload?;
    let book = store.create(book).await?;
    tracing::info!(id = book.id, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

/// GET /api/books/{id}
async fn get_book(
    State(store): State<SharedBookStore>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let Path(id) = id?;
    Ok(Json(store.get(id).await?))
}

/// DELETE /api/books/{id}
async fn delete_book(
    State(store): State<SharedBookStore>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    store.delete(id).await?;
    tracing::info!(id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}
