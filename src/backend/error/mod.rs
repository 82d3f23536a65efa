//! Backend Error Module
//!
//! Error types for the HTTP side of the server.
//!
//! - **`types`** - `BackendError` and its status mapping
//! - **`conversion`** - `IntoResponse` for `BackendError`
//!
//! ```rust,no_run
//! use sage3::backend::error::BackendError;
//! use axum::http::StatusCode;
//! use axum::response::Response;
//!
//! # async fn example() -> Result<Response, BackendError> {
//! Err(BackendError::handler(StatusCode::NOT_FOUND, "Failed to get app."))
//! # }
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::BackendError;

/// Result alias for HTTP handlers
pub type BackendResult<T> = Result<T, BackendError>;
