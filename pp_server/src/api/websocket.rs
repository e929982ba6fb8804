//! WebSocket handler for live room play.
//!
//! # Connection Flow
//!
//! 1. Client connects via `GET /ws/{game}/{room_id}?player_id=<id>&name=<name>`
//! 2. Server subscribes the connection to the room's state change
//!    notifications and sends the current view
//! 3. Server spawns a send task that pushes a fresh view after every change
//!    and forwards command responses
//! 4. On disconnect the player leaves the room
//!
//! # Client Messages
//!
//! ```json
//! {"type": "join", "password": "hunter2"}
//! {"type": "start"}
//! {"type": "action", "action": {"type": "raise", "amount": 100}}
//! {"type": "action", "action": {"type": "guess", "guess": {"type": "pair", "rank": "K"}}}
//! {"type": "advance"}
//! {"type": "leave"}
//! ```
//!
//! # Server Messages
//!
//! - `{"type": "success", "message": ..., "data": ...}` answers a command
//! - `{"type": "error", "message": ...}` answers a refused command
//! - `{"type": "view", "view": ...}` is pushed whenever the room changes

use axum::{
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use log::{error, info, warn};
use party_poker::room::StateChangeNotification;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::{AppState, ServedRoom};

/// Buffered notifications per connection
const NOTIFICATION_BUFFER: usize = 32;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    player_id: String,
    #[serde(default)]
    name: Option<String>,
}

/// Client messages received via WebSocket
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage<A> {
    Join {
        #[serde(default)]
        password: Option<String>,
    },
    Leave,
    Start,
    Action {
        action: A,
    },
    Advance,
}

/// Messages sent to the client
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage {
    Success {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<serde_json::Value>,
    },
    Error {
        message: String,
    },
    View {
        view: serde_json::Value,
    },
}

impl ServerMessage {
    fn success(message: impl Into<String>, data: impl Serialize) -> Self {
        Self::Success {
            message: message.into(),
            data: serde_json::to_value(data).ok(),
        }
    }

    fn error(message: impl ToString) -> Self {
        Self::Error {
            message: message.to_string(),
        }
    }

    fn to_text(&self) -> Option<Message> {
        match serde_json::to_string(self) {
            Ok(json) => Some(Message::Text(json.into())),
            Err(e) => {
                error!("Failed to serialize server message: {e}");
                None
            }
        }
    }
}

/// Upgrade to a WebSocket bound to one room and one player.
///
/// # Response
///
/// On success, upgrades connection to WebSocket protocol (101 Switching Protocols).
/// Returns `404 Not Found` if the room does not exist.
pub async fn websocket_handler<R: ServedRoom>(
    ws: WebSocketUpgrade,
    Path(room_id): Path<String>,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> Response {
    if query.player_id.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "player_id is required").into_response();
    }
    if R::manager(&state).get_room(&room_id).await.is_none() {
        return (StatusCode::NOT_FOUND, "Room not found").into_response();
    }

    let player_name = query.name.unwrap_or_else(|| query.player_id.clone());
    ws.on_upgrade(move |socket| {
        handle_socket::<R>(socket, room_id, query.player_id, player_name, state)
    })
}

/// Drive an established connection until either side hangs up
async fn handle_socket<R: ServedRoom>(
    socket: WebSocket,
    room_id: String,
    player_id: String,
    player_name: String,
    state: AppState,
) {
    let (mut sender, mut receiver) = socket.split();
    let manager = R::manager(&state);

    info!(
        "WebSocket connected: {} room={}, player={}",
        R::GAME,
        room_id,
        player_id
    );

    let (response_tx, mut response_rx) = mpsc::channel::<ServerMessage>(NOTIFICATION_BUFFER);
    let (notification_tx, mut notification_rx) =
        mpsc::channel::<StateChangeNotification>(NOTIFICATION_BUFFER);

    if let Err(e) = manager
        .subscribe(&room_id, &player_id, notification_tx.clone())
        .await
    {
        warn!("Failed to subscribe to room {room_id}: {e}");
        if let Some(msg) = ServerMessage::error(e).to_text() {
            let _ = sender.send(msg).await;
        }
        return;
    }

    let send_manager = manager.clone();
    let send_room = room_id.clone();
    let send_player = player_id.clone();
    let send_task = tokio::spawn(async move {
        // Initial snapshot before any change arrives
        let mut push_view = true;
        loop {
            if push_view {
                push_view = false;
                let view = match send_manager
                    .get_game_state_for_player(&send_room, &send_player)
                    .await
                {
                    Ok(view) => view,
                    Err(e) => {
                        warn!("Failed to get view of room {send_room}: {e}");
                        break;
                    }
                };
                let message = match serde_json::to_value(&view) {
                    Ok(view) => ServerMessage::View { view },
                    Err(e) => {
                        error!("Failed to serialize view: {e}");
                        continue;
                    }
                };
                if let Some(msg) = message.to_text()
                    && sender.send(msg).await.is_err()
                {
                    break;
                }
            }

            tokio::select! {
                notification = notification_rx.recv() => match notification {
                    Some(StateChangeNotification::Closed) | None => break,
                    Some(_) => push_view = true,
                },
                response = response_rx.recv() => match response {
                    Some(response) => {
                        if let Some(msg) = response.to_text()
                            && sender.send(msg).await.is_err()
                        {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }
    });

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let response = match serde_json::from_str::<ClientMessage<R::Action>>(&text) {
                    Ok(client_msg) => {
                        handle_client_message::<R>(
                            client_msg,
                            &room_id,
                            &player_id,
                            &player_name,
                            &state,
                            &notification_tx,
                        )
                        .await
                    }
                    Err(e) => {
                        warn!("Failed to parse client message from {player_id}: {e}");
                        ServerMessage::error("Invalid message format")
                    }
                };

                if response_tx.send(response).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                info!("WebSocket closed: room={room_id}, player={player_id}");
                break;
            }
            Err(e) => {
                error!("WebSocket error: {e}");
                break;
            }
            _ => {}
        }
    }

    send_task.abort();
    manager.unsubscribe(&room_id, &player_id).await;

    if manager.remove_player(&room_id, &player_id).await {
        info!("Player {player_id} left room {room_id} on disconnect");
    }

    info!("WebSocket disconnected: room={room_id}, player={player_id}");
}

/// Apply one client command and build the reply
async fn handle_client_message<R: ServedRoom>(
    msg: ClientMessage<R::Action>,
    room_id: &str,
    player_id: &str,
    player_name: &str,
    state: &AppState,
    notifications: &mpsc::Sender<StateChangeNotification>,
) -> ServerMessage {
    let manager = R::manager(state);

    match msg {
        ClientMessage::Join { password } => {
            match manager
                .join_room(player_id, room_id, password.as_deref(), player_name)
                .await
            {
                Ok(view) => {
                    // Leaving drops the subscription, so a rejoin renews it.
                    if let Err(e) = manager
                        .subscribe(room_id, player_id, notifications.clone())
                        .await
                    {
                        warn!("Failed to resubscribe {player_id} to room {room_id}: {e}");
                    }
                    ServerMessage::success("Joined room", view)
                }
                Err(e) => ServerMessage::error(e),
            }
        }

        ClientMessage::Leave => {
            if manager.remove_player(room_id, player_id).await {
                ServerMessage::success("Left room", ())
            } else {
                ServerMessage::error("Not in room")
            }
        }

        ClientMessage::Start => match manager.start_game(room_id).await {
            Ok(()) => ServerMessage::success("Game started", ()),
            Err(e) => ServerMessage::error(e),
        },

        ClientMessage::Action { action } => {
            match manager.handle_action(room_id, player_id, action).await {
                Ok(outcome) => match R::rejection(&outcome) {
                    Some(reason) => ServerMessage::error(reason),
                    None => ServerMessage::success("Action accepted", outcome),
                },
                Err(e) => ServerMessage::error(e),
            }
        }

        ClientMessage::Advance => match manager.advance(room_id).await {
            Ok(advanced) => ServerMessage::success("Advanced", advanced),
            Err(e) => ServerMessage::error(e),
        },
    }
}
