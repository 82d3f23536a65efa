//! WebSocket Module
//!
//! The `/api` WebSocket endpoint. Each connection gets its own
//! `ConnectionContext` holding the entity services, an outbound queue and a
//! `SubscriptionCache`.
//!
//! - **`handler`** - socket upgrade, reader loop and writer task
//! - **`router`** - client message dispatch
//! - **`cache`** - per-connection subscription handles

/// Socket upgrade and connection loop
pub mod handler;

/// Message dispatch
pub mod router;

/// Subscription handle cache
pub mod cache;

pub use cache::SubscriptionCache;
pub use handler::handle_ws_upgrade;
pub use router::{execute, ConnectionContext};
