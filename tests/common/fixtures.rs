//! App fixtures
//!
//! Every test gets its own app over a fresh `MemoryStore`; the store is
//! returned too so tests can seed documents or make writes outside the
//! socket.

use axum::Router;
use sage3::backend::server::create_app_with_store;
use sage3::backend::store::{DocumentStore, MemoryStore};
use sage3::shared::{AppConfig, Document, EntityKind};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn test_config() -> AppConfig {
    AppConfig::builder()
        .server_name("sage3-test")
        .build()
        .expect("test config is valid")
}

/// A fresh app and the store behind it
pub fn test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let app = create_app_with_store(test_config(), store.clone());
    (app, store)
}

/// Insert a document directly into the store
pub async fn seed(store: &MemoryStore, kind: EntityKind, id: &str, data: Value) -> Document {
    store.create(kind, id, data).await.expect("seed document")
}

pub fn room_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "A room",
        "ownerId": "u1",
        "color": "green",
        "isPrivate": false,
    })
}

pub fn board_body(name: &str, room_id: &str) -> Value {
    json!({
        "name": name,
        "description": "A board",
        "roomId": room_id,
        "ownerId": "u1",
        "color": "blue",
        "code": "ABC123",
        "isPrivate": false,
    })
}

pub fn app_body(board_id: &str) -> Value {
    json!({
        "name": "Notes",
        "roomId": "r1",
        "boardId": board_id,
        "ownerId": "u1",
        "type": "Stickie",
        "position": {"x": 10.0, "y": 20.0},
        "size": {"width": 400.0, "height": 300.0},
        "state": {"text": "hello"},
    })
}

pub fn user_body(email: &str) -> Value {
    json!({"name": "Ana", "email": email})
}
