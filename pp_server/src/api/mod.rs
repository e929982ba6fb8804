//! HTTP/WebSocket API for the party server.
//!
//! Two game variants are served side by side, each with its own
//! [`RoomManager`]. Handlers are generic over [`ServedRoom`], so every route
//! exists once per variant under `holdem` or `bs`.
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /health                              - Health check
//! GET  /api/{game}/rooms                    - List public rooms
//! POST /api/{game}/rooms                    - Create a room
//! GET  /api/{game}/rooms/{room_id}?player_id=<id>
//!                                           - One player's view of a room
//! GET  /ws/{game}/{room_id}?player_id=<id>&name=<name>
//!                                           - Live room connection
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use pp_server::{api::{AppState, create_router}, config::RoomDefaultsConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_router(AppState::new(RoomDefaultsConfig::default()));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively for development. In production, configure
//! appropriate origins, methods, and headers.

pub mod rooms;
pub mod websocket;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use party_poker::{
    BsRoom, BsRoomManager, GameRoom, HoldemRoom, HoldemRoomManager, RoomError,
    room::{ActionResult, BsOutcome, RoomManager},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::RoomDefaultsConfig;

/// Application state shared across all HTTP handlers and WebSocket connections.
#[derive(Clone)]
pub struct AppState {
    pub holdem: Arc<HoldemRoomManager>,
    pub bs: Arc<BsRoomManager>,
    pub defaults: RoomDefaultsConfig,
}

impl AppState {
    /// Fresh managers with the given creation defaults
    pub fn new(defaults: RoomDefaultsConfig) -> Self {
        Self {
            holdem: Arc::new(HoldemRoomManager::new()),
            bs: Arc::new(BsRoomManager::new()),
            defaults,
        }
    }
}

/// A room variant the API can serve: its wire types are (de)serializable and
/// its manager can be found in [`AppState`].
pub trait ServedRoom:
    Sized
    + GameRoom<
        Settings: DeserializeOwned,
        Action: DeserializeOwned,
        Outcome: Serialize,
        Advance: Serialize,
        View: Serialize,
    >
{
    fn manager(state: &AppState) -> Arc<RoomManager<Self>>;

    /// Settings for a creation request that sent none
    fn default_settings(defaults: &RoomDefaultsConfig) -> Self::Settings;

    /// Client-facing reason a move was refused, if it was
    fn rejection(outcome: &Self::Outcome) -> Option<String>;
}

impl ServedRoom for HoldemRoom {
    fn manager(state: &AppState) -> Arc<RoomManager<Self>> {
        state.holdem.clone()
    }

    fn default_settings(defaults: &RoomDefaultsConfig) -> Self::Settings {
        defaults.stakes
    }

    fn rejection(outcome: &ActionResult) -> Option<String> {
        outcome.error.map(|e| e.to_string())
    }
}

impl ServedRoom for BsRoom {
    fn manager(state: &AppState) -> Arc<RoomManager<Self>> {
        state.bs.clone()
    }

    fn default_settings(_defaults: &RoomDefaultsConfig) -> Self::Settings {}

    fn rejection(outcome: &Result<BsOutcome, RoomError>) -> Option<String> {
        outcome.as_ref().err().map(ToString::to_string)
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// HTTP status for a room failure
pub fn status_for(err: &RoomError) -> StatusCode {
    match err {
        RoomError::RoomNotFound => StatusCode::NOT_FOUND,
        RoomError::InvalidPassword => StatusCode::FORBIDDEN,
        RoomError::RoomFull | RoomError::AlreadyInRoom | RoomError::GameInProgress => {
            StatusCode::CONFLICT
        }
        RoomError::RoomClosed => StatusCode::GONE,
        RoomError::JoinFailed => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

/// Convert a room failure into an HTTP error response
pub fn error_response(err: RoomError) -> (StatusCode, Json<ErrorResponse>) {
    (
        status_for(&err),
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/holdem", game_routes::<HoldemRoom>())
        .nest("/api/bs", game_routes::<BsRoom>())
        .route(
            "/ws/holdem/{room_id}",
            get(websocket::websocket_handler::<HoldemRoom>),
        )
        .route("/ws/bs/{room_id}", get(websocket::websocket_handler::<BsRoom>))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn game_routes<R: ServedRoom>() -> Router<AppState> {
    Router::new()
        .route(
            "/rooms",
            get(rooms::list_rooms::<R>).post(rooms::create_room::<R>),
        )
        .route("/rooms/{room_id}", get(rooms::get_room::<R>))
}

/// Health check endpoint for monitoring and load balancers.
///
/// # Example
///
/// ```bash
/// curl http://localhost:3000/health
/// # {"status":"healthy","rooms":{"holdem":2,"bs":1},"timestamp":"2026-10-19T10:30:00Z"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let holdem = state.holdem.room_count().await;
    let bs = state.bs.room_count().await;

    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "rooms": {
            "holdem": holdem,
            "bs": bs,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
