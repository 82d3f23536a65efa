//! Test suite for the SAGE3 server
//!
//! - `common` - app fixtures and assertion macros
//! - `integration` - HTTP and WebSocket tests against a running app
//! - `property` - proptest checks of route and message parsing

pub mod common;
#[cfg(feature = "ssr")]
pub mod integration;
pub mod property;
