//! Shared Module
//!
//! This module contains the types that make up the WebSocket wire protocol
//! and the entity data model. They carry no server runtime dependencies and
//! are used by both the backend and the integration tests.
//!
//! # Overview
//!
//! - **`message`** - client messages, server envelopes, typed route requests
//! - **`route`** - `/api/<collection>` route parsing
//! - **`entity`** - collections, document envelope, per-collection schemas
//! - **`event`** - document change events and subscription filters
//! - **`config`** - server configuration
//! - **`error`** - shared error type

/// Wire messages
pub mod message;

/// Route parsing
pub mod route;

/// Entity documents and schemas
pub mod entity;

/// Document change events
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use message::{ClientMessage, Method, RouteRequest, ServerMessage};
pub use route::{ParentField, Route};
pub use entity::{Document, EntityData, EntityKind, EntitySchema};
pub use event::{ChangeEvent, ChangeFilter, ChangeType};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
