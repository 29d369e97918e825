//! Liveness and readiness probes.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use shelf_kernel::ModuleRegistry;

/// GET /live
pub async fn live() -> &'static str {
    "."
}

/// GET /ready: 200 when every module reports ready, otherwise 500 with the cause
pub async fn ready(State(registry): State<ModuleRegistry>) -> impl IntoResponse {
    match registry.check_ready().await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => {
            tracing::warn!(error = %format!("{:#}", err), "readiness check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("{:#}", err) })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_router;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use shelf_kernel::{settings::Settings, Module};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct Probe {
        reachable: bool,
    }

    #[async_trait::async_trait]
    impl Module for Probe {
        fn name(&self) -> &'static str {
            "probe"
        }

        async fn ready(&self) -> anyhow::Result<()> {
            if self.reachable {
                Ok(())
            } else {
                anyhow::bail!("pool timed out")
            }
        }
    }

    fn app(reachable: bool) -> axum::Router {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(Probe { reachable })).unwrap();
        build_router(&registry, &Settings::default())
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn live_returns_dot() {
        let (status, body) = get(app(false), "/live").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b".");
    }

    #[tokio::test]
    async fn ready_when_modules_reachable() {
        let (status, _) = get(app(true), "/ready").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn not_ready_reports_error() {
        let (status, body) = get(app(false), "/ready").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("module 'probe' is not ready"));
        assert!(message.contains("pool timed out"));
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (status, body) = get(app(true), "/docs/openapi.json").await;
        assert_eq!(status, StatusCode::OK);

        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(body["paths"]["/live"].is_object());
    }
}
