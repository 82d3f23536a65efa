//! Route Configuration Module
//!
//! - **`router`** - Router assembly, static files, fallback
//! - **`api_routes`** - `/api` WebSocket upgrade and the HTTP mirror
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - API endpoint handlers
//! ```

/// Main router creation
pub mod router;

/// API endpoint handlers
pub mod api_routes;

pub use router::create_router;
