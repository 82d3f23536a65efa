//! SAGE3 Server - Main Library
//!
//! Real-time entity server for SAGE3 collaborative boards. Clients talk to it
//! over a single WebSocket at `/api`, sending HTTP-like verbs (`GET`, `POST`,
//! `PUT`, `DELETE`, `SUB`, `UNSUB`) against collection routes such as
//! `/api/boards` or `/api/apps/board/:boardId`.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire protocol, routes, entity schemas, change events,
//!   configuration. No server runtime dependencies.
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum server with the WebSocket router and an HTTP mirror
//!   - Entity services over a pluggable document store
//!   - Change broadcasting and per-connection subscriptions
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the backend module
//!
//! # Usage
//!
//! ```rust,no_run
//! use sage3::backend::server::create_app;
//! use sage3::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let app = create_app(config).await;
//! # Ok(())
//! # }
//! ```
//!
//! # Wire Format
//!
//! ```text
//! client -> { "id": "r1", "method": "GET", "route": "/api/assets" }
//! server <- { "id": "r1", "success": true, "data": [ ... ] }
//!
//! client -> { "id": "s1", "method": "SUB", "route": "/api/boards/room/r7" }
//! server <- { "id": "s1", "success": true }
//! server <- { "id": "s1", "event": { "type": "CREATE", "col": "boards", "doc": { ... } } }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
