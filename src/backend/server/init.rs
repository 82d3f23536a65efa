/**
 * Server Initialization
 *
 * Builds the axum application:
 *
 * 1. Open the document store (`config::load_store`)
 * 2. Build the entity services and the application state
 * 3. Assemble the router
 */

use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_store;
use crate::backend::server::state::AppState;
use crate::backend::store::DocumentStore;
use crate::shared::AppConfig;
use axum::Router;
use std::sync::Arc;

/// Create the application with the store chosen by `config`
pub async fn create_app(config: AppConfig) -> Router<()> {
    tracing::info!("Initializing {} server", config.server_name);
    let store = load_store(&config).await;
    create_app_with_store(config, store)
}

/// Create the application on an existing store
pub fn create_app_with_store(config: AppConfig, store: Arc<dyn DocumentStore>) -> Router<()> {
    let app_state = AppState::new(config, store);
    let app = create_router(app_state);
    tracing::info!("Router configured");
    app
}
