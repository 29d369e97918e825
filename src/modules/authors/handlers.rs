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

use super::models::{Author, NewAuthor};
use super::store::AuthorStore;

pub type SharedAuthorStore = Arc<dyn AuthorStore>;

pub fn router(store: SharedAuthorStore) -> Router {
    Router::new()
        .route("/", get(list_authors).post(create_author))
        .route("/{id}", get(get_author).delete(delete_author))
        .with_state(store)
}

async fn list_authors(
    State(store): State<SharedAuthorStore>,
    page: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<Author>>, AppError> {
    let Query(page) = page?;
    Ok(Json(store.list(page).await?))
}

async fn create_author(
    State(store): State<SharedAuthorStore>,
    payload: Result<Json<NewAuthor>, JsonRejection>,
) -> Result<(StatusCode, Json<Author>), AppError> {
    let Json(author) = payload?;
    let author = store.create(author).await?;
    tracing::info!(id = author.id, "author created");
    Ok((StatusCode::CREATED, Json(author)))
}

async fn get_author(
    State(store): State<SharedAuthorStore>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Author>, AppError> {
    let Path(id) = id?;
    Ok(Json(store.get(id).await?))
}

async fn delete_author(
    State(store): State<SharedAuthorStore>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    store.delete(id).await?;
    tracing::info!(id, "author deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::authors::store::memory::MemoryAuthorStore;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn author_crud_over_http() {
        let app = router(Arc::new(MemoryAuthorStore::default()));

        let (status, created) = call(&app, post(json!({ "name": "Octavia E. Butler" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["bio"], Value::Null);
        let id = created["id"].as_i64().unwrap();

        let (status, got) = call(&app, get(&format!("/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(got["name"], "Octavia E. Butler");

        let (status, listed) = call(&app, get("/?page=1&size=10")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let delete = Request::builder()
            .method("DELETE")
            .uri(format!("/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = call(&app, delete).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = call(&app, get(&format!("/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let app = router(Arc::new(MemoryAuthorStore::default()));
        let (status, body) = call(&app, post(json!({ "name": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["details"][0]["field"], "name");
    }
}
