//! HTTP mirror tests

use crate::common::*;
use axum::http::StatusCode;
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use sage3::shared::EntityKind;
use serde_json::{json, Value};

fn server() -> (TestServer, std::sync::Arc<sage3::backend::MemoryStore>) {
    let (app, store) = test_app();
    (crate::assert_ok!(TestServer::new(app)), store)
}

#[tokio::test]
async fn test_info_reports_server() {
    let (server, _) = server();
    let response = server.get("/api/info").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["name"], "sage3-test");
    assert_eq!(body["connections"], 0);
    assert_eq!(
        body["collections"],
        json!(["assets", "apps", "boards", "rooms", "users"])
    );
}

#[tokio::test]
async fn test_create_then_read() {
    let (server, _) = server();

    let created = server.post("/api/rooms").json(&room_body("Lab")).await;
    created.assert_status(StatusCode::CREATED);
    let created: Value = created.json();
    assert_eq!(created["success"], true);
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let read: Value = server.get(&format!("/api/rooms/{}", id)).await.json();
    assert_eq!(read["data"]["data"]["name"], "Lab");
    assert_eq!(read["data"]["data"]["isListed"], true);
}

#[tokio::test]
async fn test_invalid_body_is_rejected() {
    let (server, store) = server();
    let response = server.post("/api/users").json(&user_body("not-an-email")).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"], "Failed to create user.");
    assert_eq!(store.count(EntityKind::User).await, 0);
}

#[tokio::test]
async fn test_malformed_json_body_is_bad_request() {
    let (server, store) = server();
    let response = server.post("/api/rooms").text("{not json").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid message.");
    assert_eq!(body["status"], 400);
    assert_eq!(store.count(EntityKind::Room).await, 0);
}

#[tokio::test]
async fn test_delete_then_read_fails() {
    let (server, store) = server();
    seed(&store, EntityKind::Asset, "a", json!({"file": "a.png"})).await;

    let deleted: Value = server.delete("/api/assets/a").await.json();
    assert_eq!(deleted["success"], true);

    let again = server.delete("/api/assets/a").await;
    again.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(again.json::<Value>()["message"], "Failed to delete asset.");

    let read = server.get("/api/assets/a").await;
    read.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(read.json::<Value>()["message"], "Failed to get asset.");
}

#[tokio::test]
async fn test_put_updates_fields() {
    let (server, store) = server();
    seed(&store, EntityKind::Board, "b", board_body("Main", "r1")).await;

    let updated: Value = server
        .put("/api/boards/b")
        .json(&json!({"name": "Renamed"}))
        .await
        .json();
    assert_eq!(updated["success"], true);

    let read: Value = server.get("/api/boards/b").await.json();
    assert_eq!(read["data"]["data"]["name"], "Renamed");
    assert_eq!(read["data"]["data"]["code"], "ABC123");
}

#[tokio::test]
async fn test_boards_by_room() {
    let (server, store) = server();
    seed(&store, EntityKind::Board, "b1", board_body("One", "r1")).await;
    seed(&store, EntityKind::Board, "b2", board_body("Two", "r2")).await;

    let body: Value = server.get("/api/boards/room/r2").await.json();
    let boards = body["data"].as_array().unwrap();
    assert_eq!(boards.len(), 1);
    assert_eq!(boards[0]["id"], "b2");
}

#[tokio::test]
async fn test_unknown_collection_is_not_found() {
    let (server, _) = server();
    let response = server.get("/api/widgets").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"], "Invalid route.");

    server.get("/nowhere").await.assert_status(StatusCode::NOT_FOUND);
}
