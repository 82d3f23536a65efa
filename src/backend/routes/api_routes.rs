/**
 * API Route Handlers
 *
 * HTTP mirror of the WebSocket protocol. A request is turned into the same
 * client message the socket would receive, resolved the same way, and
 * answered with the same `{id, success, data?, message?}` envelope.
 *
 * # Routes
 *
 * - `GET /api` - WebSocket upgrade
 * - `GET /api/info` - server name, version, live connections
 * - `GET|POST /api/:collection`
 * - `GET|PUT|DELETE /api/:collection/:id`
 * - `GET /api/boards/room/:roomId`, `GET /api/apps/board/:boardId`
 */

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;
use crate::backend::services::gen_id;
use crate::backend::ws::{execute, handle_ws_upgrade};
use crate::shared::message::{RequestError, INVALID_MESSAGE};
use crate::shared::{ClientMessage, EntityKind, Method, RouteRequest, ServerMessage};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{self, StatusCode, Uri};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

/// Configure API routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api", get(handle_ws_upgrade))
        .route("/api/info", get(get_info))
        .route("/api/{collection}", get(handle_rest).post(handle_rest))
        .route(
            "/api/{collection}/{id}",
            get(handle_rest).put(handle_rest).delete(handle_rest),
        )
        .route("/api/{collection}/{link}/{parent_id}", get(handle_rest))
}

#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: &'static str,
    pub connections: usize,
    pub collections: Vec<&'static str>,
}

/// `GET /api/info`
pub async fn get_info(State(state): State<AppState>) -> Json<ServerInfo> {
    Json(ServerInfo {
        name: state.config.server_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        connections: state.live_connections(),
        collections: EntityKind::ALL.iter().map(|k| k.collection()).collect(),
    })
}

/// Only the data verbs exist over HTTP; subscriptions need the socket
fn method_of(method: &http::Method) -> Method {
    match method.as_str() {
        "GET" => Method::Get,
        "POST" => Method::Post,
        "PUT" => Method::Put,
        "DELETE" => Method::Delete,
        other => Method::Other(other.to_string()),
    }
}

/// Serve one collection request over HTTP
pub async fn handle_rest(
    State(state): State<AppState>,
    method: http::Method,
    uri: Uri,
    body: Bytes,
) -> BackendResult<(StatusCode, Json<ServerMessage>)> {
    let mut message = ClientMessage::new(gen_id(), method_of(&method), uri.path());
    if !body.is_empty() {
        let body = serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!("[HTTP] Malformed body for {} {}: {}", method, uri.path(), e);
            BackendError::protocol(INVALID_MESSAGE)
        })?;
        message = message.with_body(body);
    }

    let request = RouteRequest::from_message(&message).map_err(|e| match e {
        RequestError::InvalidRoute(_) => BackendError::handler(StatusCode::NOT_FOUND, e.reply_message()),
        _ => BackendError::protocol(e.reply_message()),
    })?;

    let created = matches!(request, RouteRequest::Create(_));
    let reply = execute(&state.services, &message.id, request).await;

    let status = match &reply {
        ServerMessage::Response(envelope) if envelope.success => {
            if created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            }
        }
        _ if created => StatusCode::BAD_REQUEST,
        _ => StatusCode::NOT_FOUND,
    };

    tracing::debug!("[HTTP] {} {} -> {}", method, uri.path(), status);
    Ok((status, Json(reply)))
}
