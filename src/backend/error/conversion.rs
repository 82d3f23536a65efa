/**
 * Error Conversion
 *
 * `BackendError` converts into an axum response so handlers can return it
 * directly. The body is JSON:
 *
 * ```json
 * { "error": "Failed to get board.", "status": 404 }
 * ```
 */

use crate::backend::error::types::BackendError;
use axum::response::{IntoResponse, Response};
use axum::Json;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!("[HTTP] {}: {}", status, message);
        } else {
            tracing::debug!("[HTTP] {}: {}", status, message);
        }

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
