//! Server Module
//!
//! Server setup: state, store selection and app creation.
//!
//! ```text
//! server/
//! ├── mod.rs    - Module exports
//! ├── state.rs  - AppState and FromRef implementations
//! ├── config.rs - Document store selection
//! └── init.rs   - App creation
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use sage3::backend::server::create_app;
//! use sage3::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
//! axum::serve(listener, create_app(config).await).await?;
//! # Ok(())
//! # }
//! ```

/// Application state
pub mod state;

/// Document store selection
pub mod config;

/// App creation
pub mod init;

pub use init::{create_app, create_app_with_store};
pub use state::AppState;
