//! WebSocket end-to-end tests
//!
//! These run the app on a real port so the socket goes through the axum
//! upgrade path.

use crate::common::*;
use axum_test::{TestServer, TestWebSocket};
use pretty_assertions::assert_eq;
use sage3::backend::store::DocumentStore;
use sage3::shared::EntityKind;
use serde_json::{json, Value};
use std::sync::Arc;

async fn connect() -> (TestServer, TestWebSocket, Arc<sage3::backend::MemoryStore>) {
    let (app, store) = test_app();
    let server = crate::assert_ok!(TestServer::builder().http_transport().build(app));
    let socket = server.get_websocket("/api").await.into_websocket().await;
    (server, socket, store)
}

#[tokio::test]
async fn test_get_collection_over_socket() {
    let (_server, mut socket, store) = connect().await;
    seed(&store, EntityKind::Asset, "a", json!({})).await;
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    seed(&store, EntityKind::Asset, "b", json!({})).await;

    socket
        .send_json(&json!({"id": "r1", "method": "GET", "route": "/api/assets"}))
        .await;
    let reply: Value = socket.receive_json().await;

    crate::assert_success!(reply, "r1");
    let ids: Vec<&str> = reply["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn test_protocol_failures_over_socket() {
    let (_server, mut socket, _store) = connect().await;

    socket
        .send_json(&json!({"id": "r9", "method": "PATCH", "route": "/api/assets"}))
        .await;
    let reply: Value = socket.receive_json().await;
    crate::assert_failure!(reply, "r9", "Invalid method.");

    socket
        .send_json(&json!({"id": "r2", "method": "DELETE", "route": "/api/assets/missing"}))
        .await;
    let reply: Value = socket.receive_json().await;
    crate::assert_failure!(reply, "r2", "Failed to delete asset.");
}

#[tokio::test]
async fn test_subscription_lifecycle() {
    let (_server, mut socket, _store) = connect().await;

    socket
        .send_json(&json!({"id": "s1", "method": "SUB", "route": "/api/rooms"}))
        .await;
    let confirmed: Value = socket.receive_json().await;
    assert_eq!(confirmed, json!({"id": "s1", "success": true}));

    socket
        .send_json(&json!({"id": "c1", "method": "POST", "route": "/api/rooms", "body": room_body("Lab")}))
        .await;

    // The create reply and the push may arrive in either order
    let first: Value = socket.receive_json().await;
    let second: Value = socket.receive_json().await;
    let (reply, push) = if first["id"] == "c1" { (first, second) } else { (second, first) };

    crate::assert_success!(reply, "c1");
    assert_eq!(push["id"], "s1");
    assert_eq!(push["event"]["type"], "CREATE");
    assert_eq!(push["event"]["col"], "rooms");
    assert_eq!(push["event"]["doc"]["id"], reply["data"]["id"]);

    socket
        .send_json(&json!({"id": "s1", "method": "UNSUB", "route": "/api/rooms"}))
        .await;
    socket
        .send_json(&json!({"id": "s1", "method": "UNSUB", "route": "/api/rooms"}))
        .await;

    // No push follows: the next message is the create reply
    socket
        .send_json(&json!({"id": "c2", "method": "POST", "route": "/api/rooms", "body": room_body("Studio")}))
        .await;
    let reply: Value = socket.receive_json().await;
    crate::assert_success!(reply, "c2");

    socket
        .send_json(&json!({"id": "g1", "method": "GET", "route": "/api/rooms"}))
        .await;
    let reply: Value = socket.receive_json().await;
    crate::assert_success!(reply, "g1");
    assert_eq!(reply["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_connection_count_in_info() {
    let (server, mut socket, _store) = connect().await;

    // A reply proves the connection loop is running
    socket
        .send_json(&json!({"id": "p", "method": "GET", "route": "/api/users"}))
        .await;
    let _: Value = socket.receive_json().await;

    let info: Value = server.get("/api/info").await.json();
    assert_eq!(info["connections"], 1);
}

#[tokio::test]
async fn test_back_to_back_sub_unsub() {
    let (_server, mut socket, store) = connect().await;

    for round in 0..20 {
        let sub = format!("s{}", round);
        socket
            .send_json(&json!({"id": sub, "method": "SUB", "route": "/api/boards"}))
            .await;
        socket
            .send_json(&json!({"id": sub, "method": "UNSUB", "route": "/api/boards"}))
            .await;

        let confirmed: Value = socket.receive_json().await;
        assert_eq!(confirmed, json!({"id": sub, "success": true}));
    }

    // Nothing is live, so the write produces only its own reply
    let create = json!({"id": "c1", "method": "POST", "route": "/api/boards", "body": board_body("Main", "r1")});
    socket.send_json(&create).await;
    let reply: Value = socket.receive_json().await;
    crate::assert_success!(reply, "c1");

    socket
        .send_json(&json!({"id": "g1", "method": "GET", "route": "/api/boards"}))
        .await;
    let reply: Value = socket.receive_json().await;
    crate::assert_success!(reply, "g1");
    assert_eq!(store.changes().receiver_count(), 0);
}

#[tokio::test]
async fn test_close_releases_subscriptions() {
    let (server, mut socket, store) = connect().await;

    for (id, route) in [("s1", "/api/rooms"), ("s2", "/api/boards/room/r1"), ("s3", "/api/users/u1")] {
        socket
            .send_json(&json!({"id": id, "method": "SUB", "route": route}))
            .await;
        let confirmed: Value = socket.receive_json().await;
        crate::assert_success!(confirmed, id);
    }
    assert_eq!(store.changes().receiver_count(), 3);

    socket.close().await;

    let released = tokio::time::timeout(std::time::Duration::from_secs(2), async {
        while store.changes().receiver_count() > 0 || server_connections(&server).await > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(released.is_ok(), "subscriptions still live after close");
}

async fn server_connections(server: &TestServer) -> u64 {
    let info: Value = server.get("/api/info").await.json();
    info["connections"].as_u64().unwrap_or(0)
}
