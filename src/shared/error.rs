//! Shared Error Types
//!
//! This module defines error types that are shared between the wire protocol
//! layer and the backend. These errors represent common failure cases that can
//! occur while decoding client messages, parsing routes or validating entity
//! documents.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - Entity schema validation failures
//! - `RouteError` - Routes that do not name a known collection or shape
//!
//! # Usage
//!
//! ```rust
//! use sage3::shared::error::SharedError;
//!
//! let error = SharedError::validation("name", "missing field");
//! assert!(error.to_string().contains("name"));
//! ```
use thiserror::Error;

/// Shared error types that can occur in both the protocol layer and the backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Entity schema validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field (or collection) that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Route could not be parsed into a known collection route
    #[error("Route error: {route}")]
    RouteError {
        /// The offending route string
        route: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new route error
    pub fn route(route: impl Into<String>) -> Self {
        Self::RouteError {
            route: route.into(),
        }
    }
}

/// Helper trait for converting serialization errors
impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
