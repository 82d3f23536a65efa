/**
 * Backend Error Types
 *
 * Errors raised by HTTP handlers. Every variant maps to a status code and
 * converts into a JSON response (see `conversion`).
 *
 * The WebSocket router never uses these: socket failures are always
 * answered with a `success: false` envelope instead.
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Backend-specific error types
///
/// ```rust
/// use sage3::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::handler(StatusCode::NOT_FOUND, "Failed to get board.");
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Request could not be served; carries the status to answer with
    #[error("Handler error: {message}")]
    HandlerError {
        status: StatusCode,
        message: String,
    },

    /// Request violates the API's verb or body rules
    #[error("Protocol error: {message}")]
    ProtocolError { message: String },
}

impl BackendError {
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::ProtocolError {
            message: message.into(),
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::ProtocolError { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Human-readable message sent to the client
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::ProtocolError { message } => message.clone(),
        }
    }
}
