/**
 * Application State
 *
 * `AppState` is the axum router state. It is cheap to clone: every field is
 * either an `Arc` or a bundle of `Arc`s.
 *
 * `FromRef` impls let handlers extract just the part they need, e.g.
 * `State(services): State<Services>`.
 */

use crate::backend::services::Services;
use crate::backend::store::DocumentStore;
use crate::shared::AppConfig;
use axum::extract::FromRef;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,

    /// Document store shared by every service
    pub store: Arc<dyn DocumentStore>,

    /// Entity services over `store`
    pub services: Services,

    /// Number of open WebSocket connections
    pub connections: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            config: Arc::new(config),
            services: Services::new(store.clone()),
            store,
            connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn live_connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

impl FromRef<AppState> for Services {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.services.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn DocumentStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}
