/**
 * Subscription Cache
 *
 * Maps a client request id to the unsubscribe handles opened for it. One
 * cache exists per WebSocket connection; `UNSUB` releases one id and closing
 * the socket releases everything.
 *
 * Handles are moved out under the lock and released after it is dropped, so
 * a slow release never blocks other requests on the same connection.
 */

use crate::backend::realtime::Unsubscribe;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
pub struct SubscriptionCache {
    entries: Mutex<HashMap<String, Vec<Unsubscribe>>>,
}

impl SubscriptionCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Vec<Unsubscribe>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register handles under `id`, appending to any already there
    pub fn add(&self, id: impl Into<String>, handles: Vec<Unsubscribe>) {
        if handles.is_empty() {
            return;
        }
        self.entries().entry(id.into()).or_default().extend(handles);
    }

    /// Release and forget every handle registered under `id`
    ///
    /// Returns `false` when nothing was registered.
    pub async fn delete(&self, id: &str) -> bool {
        let handles = self.entries().remove(id);
        match handles {
            Some(handles) => {
                release(id, handles).await;
                true
            }
            None => {
                tracing::debug!("[SubscriptionCache] Nothing to release for {}", id);
                false
            }
        }
    }

    /// Release every handle of every id
    pub async fn clear(&self) {
        let drained: Vec<(String, Vec<Unsubscribe>)> = self.entries().drain().collect();
        if !drained.is_empty() {
            tracing::debug!("[SubscriptionCache] Releasing {} subscriptions", drained.len());
        }
        for (id, handles) in drained {
            release(&id, handles).await;
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries().contains_key(id)
    }

    /// Number of ids with live handles
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

async fn release(id: &str, handles: Vec<Unsubscribe>) {
    for handle in handles {
        if let Err(e) = handle.call().await {
            tracing::error!("[SubscriptionCache] Failed to release {}: {}", id, e);
        }
    }
}
