//! Real-time Change Module
//!
//! This module fans document changes out to open subscriptions.
//!
//! # Architecture
//!
//! - **`broadcast`** - the change broadcast channel and send helper
//! - **`subscription`** - filtered subscription tasks and their release handles
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs          - Module exports and documentation
//! ├── broadcast.rs    - Change broadcasting
//! └── subscription.rs - Subscription tasks
//! ```

/// Change broadcasting utilities
pub mod broadcast;

/// Filtered subscription tasks
pub mod subscription;

// Re-export commonly used types and functions
pub use broadcast::{broadcast_change, change_channel, ChangeBroadcast};
pub use subscription::{spawn_subscription, ChangeCallback, Unsubscribe};
