/**
 * Router Configuration
 *
 * Combines the API routes, static files and the 404 fallback into one
 * router.
 *
 * # Route Order
 *
 * 1. API routes (`/api` WebSocket, `/api/info`, collection routes)
 * 2. Static files under `/static`
 * 3. Fallback (404)
 */

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;
use axum::http::{StatusCode, Uri};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let public_dir = app_state.config.public_dir.clone();

    let router = configure_api_routes(Router::new());

    let router = router.nest_service("/static", ServeDir::new(public_dir));

    let router = router.fallback(not_found);

    router.layer(TraceLayer::new_for_http()).with_state(app_state)
}

async fn not_found(uri: Uri) -> BackendError {
    BackendError::handler(StatusCode::NOT_FOUND, format!("No route for {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::store::MemoryStore;
    use crate::shared::AppConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn router() -> Router<()> {
        create_router(AppState::new(AppConfig::default(), Arc::new(MemoryStore::default())))
    }

    async fn get_json(path: &str) -> (StatusCode, serde_json::Value) {
        let response = router()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_info_route() {
        let (status, body) = get_json("/api/info").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "sage3");
        assert_eq!(body["connections"], 0);
    }

    #[tokio::test]
    async fn test_collection_route_returns_envelope() {
        let (status, body) = get_json("/api/boards").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_fallback_is_json_404() {
        let (status, body) = get_json("/missing/page").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
    }
}
