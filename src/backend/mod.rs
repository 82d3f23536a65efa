//! Backend Module
//!
//! Server-side code for SAGE3: an axum server whose `/api` WebSocket lets
//! clients read, write and subscribe to the five entity collections
//! (assets, apps, boards, rooms, users).
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Application state, store selection, app creation
//! - **`routes`** - Router assembly and the HTTP mirror of the protocol
//! - **`ws`** - WebSocket connections, message routing, subscription cache
//! - **`services`** - One entity service per collection
//! - **`store`** - Document stores (in-memory, SQLite)
//! - **`realtime`** - Change broadcast and subscription tasks
//! - **`error`** - Backend error types
//!
//! ```text
//! backend/
//! ├── mod.rs
//! ├── server/     - State and initialization
//! ├── routes/     - Route configuration
//! ├── ws/         - WebSocket router and subscription cache
//! ├── services/   - Entity services
//! ├── store/      - Document stores
//! ├── realtime/   - Change fan-out
//! └── error/      - Error types
//! ```
//!
//! # Request Flow
//!
//! A client message on the socket is decoded into a `RouteRequest`, handed
//! to the matching entity service, and answered with a JSON envelope. Every
//! write in the store is broadcast as a `ChangeEvent`; subscriptions opened
//! with `SUB` filter that broadcast and push matching events back to their
//! socket until `UNSUB` or disconnect.
//!
//! # Example
//!
//! ```rust,no_run
//! use sage3::backend::server::create_app;
//! use sage3::shared::AppConfig;
//!
//! # async fn example() {
//! let app = create_app(AppConfig::default()).await;
//! // Use app with axum::serve
//! # }
//! ```

/// Server setup
pub mod server;

/// Route configuration
pub mod routes;

/// WebSocket endpoint
pub mod ws;

/// Entity services
pub mod services;

/// Document stores
pub mod store;

/// Change broadcasting
pub mod realtime;

/// Backend error types
pub mod error;

pub use error::BackendError;
pub use server::create_app;
pub use services::Services;
pub use store::{DocumentStore, MemoryStore, SqliteStore};
