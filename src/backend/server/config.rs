/**
 * Store Selection
 *
 * Picks the document store from the configuration. With a `database_url`
 * the SQLite store is used; without one, or when the database cannot be
 * opened, the server runs on the in-memory store.
 *
 * Store errors are logged but never prevent startup.
 */

use crate::backend::store::{DocumentStore, MemoryStore, SqliteStore};
use crate::shared::AppConfig;
use std::sync::Arc;

/// Open the configured document store
///
/// ```rust,no_run
/// use sage3::backend::server::config::load_store;
/// use sage3::shared::AppConfig;
///
/// # async fn example() {
/// let store = load_store(&AppConfig::default()).await;
/// # }
/// ```
pub async fn load_store(config: &AppConfig) -> Arc<dyn DocumentStore> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set. Documents will be kept in memory only.");
        return Arc::new(MemoryStore::new(config.broadcast_capacity));
    };

    match SqliteStore::connect(database_url, config.broadcast_capacity).await {
        Ok(store) => {
            tracing::info!("Using SQLite document store");
            Arc::new(store)
        }
        Err(e) => {
            tracing::error!("Failed to open database: {}", e);
            tracing::warn!("Falling back to the in-memory document store.");
            Arc::new(MemoryStore::new(config.broadcast_capacity))
        }
    }
}
