//! Integration tests for the HTTP routes.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use pp_server::api::{AppState, create_router};
use pp_server::config::RoomDefaultsConfig;
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_server() -> (axum::Router, AppState) {
    let state = AppState::new(RoomDefaultsConfig::default());
    (create_router(state.clone()), state)
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check_endpoint() {
    let (app, _) = test_server();

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["rooms"]["holdem"], 0);
    assert_eq!(body["rooms"]["bs"], 0);
}

// ============================================================================
// Room Creation Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_list_holdem_room() {
    let (app, _) = test_server();

    let (status, room) = send(
        &app,
        post_json(
            "/api/holdem/rooms",
            json!({"creator_id": "alice", "room_name": "Main table"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(room["id"].as_str().unwrap().starts_with("PUB-"));
    assert_eq!(room["game"], "holdem");
    assert_eq!(room["max_players"], 6);
    assert_eq!(room["status"], "waiting");
    assert_eq!(room["has_password"], false);

    let (status, rooms) = send(&app, get("/api/holdem/rooms")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rooms.as_array().unwrap().len(), 1);
    assert_eq!(rooms[0]["id"], room["id"]);

    // Variants do not share rooms
    let (_, rooms) = send(&app, get("/api/bs/rooms")).await;
    assert!(rooms.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_default_stakes_applied() {
    let (app, _) = test_server();

    let (_, room) = send(
        &app,
        post_json(
            "/api/holdem/rooms",
            json!({"creator_id": "alice", "room_name": "Defaults"}),
        ),
    )
    .await;

    let uri = format!("/api/holdem/rooms/{}", room["id"].as_str().unwrap());
    let (status, view) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["stakes"]["buy_in"], 1000);
    assert_eq!(view["stakes"]["small_blind"], 10);
    assert_eq!(view["stakes"]["big_blind"], 20);
}

#[tokio::test]
async fn test_invalid_stakes_rejected() {
    let (app, state) = test_server();

    let (status, body) = send(
        &app,
        post_json(
            "/api/holdem/rooms",
            json!({
                "creator_id": "alice",
                "room_name": "Broken",
                "settings": {"buy_in": 1000, "small_blind": 20, "big_blind": 10}
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid room configuration"));
    assert_eq!(state.holdem.room_count().await, 0);
}

#[tokio::test]
async fn test_oversized_room_rejected() {
    let (app, _) = test_server();

    let (status, _) = send(
        &app,
        post_json(
            "/api/bs/rooms",
            json!({"creator_id": "alice", "room_name": "Crowd", "max_players": 11}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_private_bs_room_hidden_but_reachable() {
    let (app, state) = test_server();

    let (status, room) = send(
        &app,
        post_json(
            "/api/bs/rooms",
            json!({
                "creator_id": "alice",
                "room_name": "Liars club",
                "is_public": false,
                "password": "hunter2"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = room["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("LIA-"));
    assert_eq!(room["has_password"], true);

    let (_, rooms) = send(&app, get("/api/bs/rooms")).await;
    assert!(rooms.as_array().unwrap().is_empty());

    state
        .bs
        .join_room("alice", &id, Some("hunter2"), "Alice")
        .await
        .unwrap();

    let (status, view) = send(&app, get(&format!("/api/bs/rooms/{id}?player_id=alice"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["players"][0]["name"], "Alice");
    assert_eq!(view["room"]["player_count"], 1);
}

// ============================================================================
// View Tests
// ============================================================================

#[tokio::test]
async fn test_unknown_room_is_404() {
    let (app, _) = test_server();

    let (status, body) = send(&app, get("/api/holdem/rooms/PUB-NOPE00")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Room not found");
}

#[tokio::test]
async fn test_spectator_cannot_see_hole_cards() {
    let (app, state) = test_server();

    let (_, room) = send(
        &app,
        post_json(
            "/api/holdem/rooms",
            json!({"creator_id": "alice", "room_name": "Heads up"}),
        ),
    )
    .await;
    let id = room["id"].as_str().unwrap().to_string();

    state.holdem.join_room("alice", &id, None, "Alice").await.unwrap();
    state.holdem.join_room("bob", &id, None, "Bob").await.unwrap();
    state.holdem.start_game(&id).await.unwrap();

    let (_, own) = send(&app, get(&format!("/api/holdem/rooms/{id}?player_id=alice"))).await;
    let alice = own["players"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == "alice")
        .unwrap();
    assert_eq!(alice["hole_cards"].as_array().unwrap().len(), 2);

    let (_, spectator) = send(&app, get(&format!("/api/holdem/rooms/{id}"))).await;
    for player in spectator["players"].as_array().unwrap() {
        assert!(player["hole_cards"].is_null());
    }
    assert_eq!(spectator["game"]["pot"], 30);
}
