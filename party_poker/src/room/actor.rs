//! Room actor implementation with async message handling.

use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};

use super::{
    GameRoom, PlayerId, RoomError, RoomId,
    messages::{LeaveResponse, RoomMessage, StateChangeNotification},
};

/// Inbox depth per room
const INBOX_CAPACITY: usize = 100;

/// Room actor handle for sending messages
pub struct RoomHandle<R: GameRoom> {
    sender: mpsc::Sender<RoomMessage<R>>,
    room_id: RoomId,
}

impl<R: GameRoom> Clone for RoomHandle<R> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            room_id: self.room_id.clone(),
        }
    }
}

impl<R: GameRoom> RoomHandle<R> {
    /// Create a new room handle
    pub fn new(sender: mpsc::Sender<RoomMessage<R>>, room_id: RoomId) -> Self {
        Self { sender, room_id }
    }

    /// Get room ID
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Send a message to the room
    pub async fn send(&self, message: RoomMessage<R>) -> Result<(), RoomError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| RoomError::RoomClosed)
    }

    /// Send a message carrying a oneshot reply channel and wait for the reply
    pub async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> RoomMessage<R>,
    ) -> Result<T, RoomError> {
        let (tx, rx) = oneshot::channel();
        self.send(build(tx)).await?;
        rx.await.map_err(|_| RoomError::RoomClosed)
    }
}

/// Room actor owning a single game room
pub struct RoomActor<R: GameRoom> {
    /// Game state machine
    room: R,

    /// Message inbox
    inbox: mpsc::Receiver<RoomMessage<R>>,

    /// Subscribers for state change notifications
    subscribers: HashMap<PlayerId, mpsc::Sender<StateChangeNotification>>,

    /// Is room closed
    is_closed: bool,
}

impl<R: GameRoom> RoomActor<R> {
    /// Create a new room actor
    ///
    /// # Returns
    ///
    /// * `(RoomActor, RoomHandle)` - Actor and handle for sending messages
    pub fn new(room: R) -> (Self, RoomHandle<R>) {
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
        let handle = RoomHandle::new(sender, room.config().id.clone());

        let actor = Self {
            room,
            inbox,
            subscribers: HashMap::new(),
            is_closed: false,
        };

        (actor, handle)
    }

    /// Run the room actor event loop
    pub async fn run(mut self) {
        log::info!(
            "Room {} '{}' ({}) starting",
            self.room.config().id,
            self.room.config().name,
            R::GAME
        );

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);

            if self.is_closed {
                break;
            }
        }

        self.notify_state_change(StateChangeNotification::Closed);
        log::info!(
            "Room {} '{}' closed",
            self.room.config().id,
            self.room.config().name
        );
    }

    /// Handle a room message
    fn handle_message(&mut self, message: RoomMessage<R>) {
        match message {
            RoomMessage::Join {
                player_id,
                player_name,
                password,
                response,
            } => {
                let result = self.handle_join(&player_id, &player_name, password.as_deref());
                let _ = response.send(result);
            }

            RoomMessage::Leave {
                player_id,
                response,
            } => {
                let removed = self.room.remove_player(&player_id);
                self.subscribers.remove(&player_id);
                if removed {
                    self.notify_state_change(StateChangeNotification::PlayerListChanged);
                }
                let _ = response.send(LeaveResponse {
                    removed,
                    remaining: self.room.player_count(),
                });
            }

            RoomMessage::StartGame { response } => {
                let result = self.room.start_game();
                if result.is_ok() {
                    self.notify_state_change(StateChangeNotification::StateChanged);
                }
                let _ = response.send(result);
            }

            RoomMessage::TakeAction {
                player_id,
                action,
                response,
            } => {
                let outcome = self.room.handle_action(&player_id, action);
                if R::is_accepted(&outcome) {
                    self.notify_state_change(StateChangeNotification::StateChanged);
                }
                let _ = response.send(outcome);
            }

            RoomMessage::Advance { response } => {
                let result = self.room.advance();
                if result.is_ok() {
                    self.notify_state_change(StateChangeNotification::StateChanged);
                }
                let _ = response.send(result);
            }

            RoomMessage::GetView {
                player_id,
                response,
            } => {
                let _ = response.send(self.room.view_for(&player_id));
            }

            RoomMessage::GetSummary { response } => {
                let _ = response.send(self.room.summary());
            }

            RoomMessage::Execute { op } => {
                if op(&mut self.room) {
                    self.notify_state_change(StateChangeNotification::StateChanged);
                }
            }

            RoomMessage::Subscribe { player_id, sender } => {
                log::debug!(
                    "Player {} subscribed to room {} state changes",
                    player_id,
                    self.room.config().id
                );
                self.subscribers.insert(player_id, sender);
            }

            RoomMessage::Unsubscribe { player_id } => {
                self.subscribers.remove(&player_id);
                log::debug!(
                    "Player {} unsubscribed from room {} state changes",
                    player_id,
                    self.room.config().id
                );
            }

            RoomMessage::CloseIfEmpty { response } => {
                let empty = self.room.player_count() == 0;
                self.is_closed = empty;
                let _ = response.send(empty);
            }

            RoomMessage::Close { response } => {
                self.is_closed = true;
                let _ = response.send(());
            }
        }
    }

    fn handle_join(
        &mut self,
        player_id: &str,
        player_name: &str,
        password: Option<&str>,
    ) -> Result<R::View, RoomError> {
        self.room.config().verify_password(password)?;
        self.room.add_player(player_id, player_name)?;
        self.notify_state_change(StateChangeNotification::PlayerListChanged);
        Ok(self.room.view_for(player_id))
    }

    /// Broadcast state change notification to all subscribers
    fn notify_state_change(&mut self, notification: StateChangeNotification) {
        self.subscribers
            .retain(|player_id, sender| match sender.try_send(notification) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!(
                        "Subscriber {} channel full, dropping notification",
                        player_id
                    );
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Subscriber {} disconnected, removing", player_id);
                    false
                }
            });
    }
}
