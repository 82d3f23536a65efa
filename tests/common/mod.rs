//! Common test utilities and helpers
//!
//! - App fixtures over an in-memory store
//! - Sample entity bodies
//! - Custom assertion macros

pub mod assertions;
#[cfg(feature = "ssr")]
pub mod fixtures;

#[cfg(feature = "ssr")]
pub use fixtures::*;
