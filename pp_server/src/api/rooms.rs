//! Room REST handlers.
//!
//! Listing and creation are plain request/response. Joining and playing go
//! through the WebSocket in [`super::websocket`], which keeps one connection
//! per seated player.
//!
//! # Examples
//!
//! Create a private Hold'em room:
//! ```bash
//! curl -X POST http://localhost:6969/api/holdem/rooms \
//!   -H "Content-Type: application/json" \
//!   -d '{"creator_id": "alice", "room_name": "Friday", "is_public": false, "password": "hunter2"}'
//! ```

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use party_poker::{RoomListItem, RoomOptions};
use serde::Deserialize;

use super::{AppState, ErrorResponse, ServedRoom, error_response};

#[derive(Debug, Deserialize)]
pub struct CreateRoomRequest<S> {
    pub creator_id: String,
    pub room_name: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub max_players: Option<usize>,
    #[serde(default = "public_by_default")]
    pub is_public: bool,
    #[serde(default)]
    pub settings: Option<S>,
}

fn public_by_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub player_id: Option<String>,
}

/// List public rooms of one variant.
///
/// Waiting rooms come first, fuller rooms before emptier ones.
pub async fn list_rooms<R: ServedRoom>(State(state): State<AppState>) -> Json<Vec<RoomListItem>> {
    Json(R::manager(&state).get_public_rooms().await)
}

/// Create a room. Missing fields fall back to the server's room defaults.
///
/// # Errors
///
/// - `400 Bad Request`: invalid name, capacity or stakes
pub async fn create_room<R: ServedRoom>(
    State(state): State<AppState>,
    Json(request): Json<CreateRoomRequest<R::Settings>>,
) -> Result<(StatusCode, Json<RoomListItem>), (StatusCode, Json<ErrorResponse>)> {
    let options = RoomOptions {
        room_name: request.room_name,
        password: request.password,
        max_players: request.max_players.unwrap_or(state.defaults.max_players),
        is_public: request.is_public,
        settings: request
            .settings
            .unwrap_or_else(|| R::default_settings(&state.defaults)),
    };

    let room = R::manager(&state)
        .create_room(&request.creator_id, options)
        .await
        .map_err(error_response)?;

    log::info!(
        "{} created {} room {} '{}'",
        request.creator_id,
        R::GAME,
        room.id,
        room.name
    );
    Ok((StatusCode::CREATED, Json(room)))
}

/// One player's view of a room. Without `player_id` the spectator view is
/// returned.
///
/// # Errors
///
/// - `404 Not Found`: no such room
pub async fn get_room<R: ServedRoom>(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<R::View>, (StatusCode, Json<ErrorResponse>)> {
    let player_id = query.player_id.unwrap_or_default();
    R::manager(&state)
        .get_game_state_for_player(&room_id, &player_id)
        .await
        .map(Json)
        .map_err(error_response)
}
