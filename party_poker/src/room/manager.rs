//! Room manager for spawning and routing to room actors.

use chrono::{DateTime, Duration, Utc};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{RwLock, mpsc, oneshot};

use super::{
    GameRoom, RoomError, RoomId, RoomListItem, RoomStatus,
    actor::{RoomActor, RoomHandle},
    bs::{BsAdvance, BsRoom},
    config::{ROOM_RETENTION_HOURS, RoomConfig, RoomOptions, generate_room_id, hash_password},
    holdem::{HoldemRoom, ShowdownResult},
    messages::{RoomMessage, StateChangeNotification},
};

/// Attempts at drawing an unused room code before giving up
const ROOM_ID_ATTEMPTS: usize = 16;

pub type HoldemRoomManager = RoomManager<HoldemRoom>;
pub type BsRoomManager = RoomManager<BsRoom>;

/// Room manager for one game variant
pub struct RoomManager<R: GameRoom> {
    /// Active room handles
    rooms: Arc<RwLock<HashMap<RoomId, RoomHandle<R>>>>,

    /// Cached listing entries (avoids a message round trip per room when
    /// listing)
    listings: Arc<RwLock<HashMap<RoomId, RoomListItem>>>,

    /// How long an empty room is kept after creation
    retention: Duration,
}

impl<R: GameRoom> Default for RoomManager<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: GameRoom> RoomManager<R> {
    /// Create a new room manager
    pub fn new() -> Self {
        Self::with_retention(Duration::hours(ROOM_RETENTION_HOURS))
    }

    /// Create a room manager with a custom idle retention window
    pub fn with_retention(retention: Duration) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            listings: Arc::new(RwLock::new(HashMap::new())),
            retention,
        }
    }

    /// Create and spawn a new room
    ///
    /// # Arguments
    ///
    /// * `creator_id` - Player asking for the room
    /// * `options` - Name, capacity, visibility, password and variant settings
    ///
    /// # Returns
    ///
    /// * `Result<RoomListItem, RoomError>` - Listing entry of the new room
    pub async fn create_room(
        &self,
        creator_id: &str,
        options: RoomOptions<R::Settings>,
    ) -> Result<RoomListItem, RoomError> {
        options.validate(R::MAX_SEATS)?;
        R::validate_settings(&options.settings)?;

        let password_hash = options.effective_password().map(hash_password).transpose()?;

        let mut rooms = self.rooms.write().await;
        let id = (0..ROOM_ID_ATTEMPTS)
            .map(|_| generate_room_id(&options.room_name, options.is_public))
            .find(|id| !rooms.contains_key(id))
            .ok_or_else(|| RoomError::InvalidConfig("No room codes available".to_string()))?;

        let config = RoomConfig {
            id: id.clone(),
            name: options.room_name.trim().to_string(),
            password_hash,
            max_players: options.max_players,
            is_public: options.is_public,
            creator_id: creator_id.to_string(),
            created_at: Utc::now(),
        };

        let room = R::new(config, options.settings);
        let summary = room.summary();
        let (actor, handle) = RoomActor::new(room);
        rooms.insert(id.clone(), handle);
        drop(rooms);

        self.listings.write().await.insert(id.clone(), summary.clone());

        tokio::spawn(async move {
            actor.run().await;
        });

        log::info!(
            "Created {} room {} '{}' for {}",
            R::GAME,
            id,
            summary.name,
            creator_id
        );
        Ok(summary)
    }

    /// Get a room handle
    pub async fn get_room(&self, room_id: &str) -> Option<RoomHandle<R>> {
        self.rooms.read().await.get(room_id).cloned()
    }

    async fn handle(&self, room_id: &str) -> Result<RoomHandle<R>, RoomError> {
        self.get_room(room_id).await.ok_or(RoomError::RoomNotFound)
    }

    /// Seat a player. Checks run in order: room exists, password, not
    /// already seated, capacity.
    ///
    /// # Returns
    ///
    /// * `Result<R::View, RoomError>` - The joining player's view
    pub async fn join_room(
        &self,
        player_id: &str,
        room_id: &str,
        password: Option<&str>,
        player_name: &str,
    ) -> Result<R::View, RoomError> {
        let handle = self.handle(room_id).await?;
        let view = handle
            .request(|response| RoomMessage::Join {
                player_id: player_id.to_string(),
                player_name: player_name.to_string(),
                password: password.map(str::to_string),
                response,
            })
            .await
            .map_err(|_| RoomError::JoinFailed)??;

        self.refresh_listing(&handle).await;
        Ok(view)
    }

    /// Remove a player. A room left empty is closed straight away.
    ///
    /// # Returns
    ///
    /// * `bool` - Whether the player was seated in the room
    pub async fn remove_player(&self, room_id: &str, player_id: &str) -> bool {
        let Some(handle) = self.get_room(room_id).await else {
            return false;
        };

        let left = handle
            .request(|response| RoomMessage::Leave {
                player_id: player_id.to_string(),
                response,
            })
            .await;

        match left {
            Ok(left) if left.removed && left.remaining == 0 => {
                self.close_if_empty(room_id).await;
                true
            }
            Ok(left) => {
                self.refresh_listing(&handle).await;
                left.removed
            }
            Err(_) => false,
        }
    }

    /// Start the game in a room
    pub async fn start_game(&self, room_id: &str) -> Result<(), RoomError> {
        let handle = self.handle(room_id).await?;
        handle
            .request(|response| RoomMessage::StartGame { response })
            .await??;
        self.refresh_listing(&handle).await;
        Ok(())
    }

    /// Apply a player move
    pub async fn handle_action(
        &self,
        room_id: &str,
        player_id: &str,
        action: R::Action,
    ) -> Result<R::Outcome, RoomError> {
        let handle = self.handle(room_id).await?;
        let outcome = handle
            .request(|response| RoomMessage::TakeAction {
                player_id: player_id.to_string(),
                action,
                response,
            })
            .await?;
        self.refresh_listing(&handle).await;
        Ok(outcome)
    }

    /// Settle the current hand or round, or begin the next one
    pub async fn advance(&self, room_id: &str) -> Result<R::Advance, RoomError> {
        let handle = self.handle(room_id).await?;
        let advanced = handle
            .request(|response| RoomMessage::Advance { response })
            .await??;
        self.refresh_listing(&handle).await;
        Ok(advanced)
    }

    /// Room state as seen by one player
    pub async fn get_game_state_for_player(
        &self,
        room_id: &str,
        player_id: &str,
    ) -> Result<R::View, RoomError> {
        self.handle(room_id)
            .await?
            .request(|response| RoomMessage::GetView {
                player_id: player_id.to_string(),
                response,
            })
            .await
    }

    /// Public rooms, open rooms first, fuller rooms before emptier ones
    pub async fn get_public_rooms(&self) -> Vec<RoomListItem> {
        let listings = self.listings.read().await;
        let mut rooms: Vec<RoomListItem> = listings
            .values()
            .filter(|room| room.is_public)
            .cloned()
            .collect();
        drop(listings);

        rooms.sort_by(|a, b| {
            (b.status == RoomStatus::Waiting)
                .cmp(&(a.status == RoomStatus::Waiting))
                .then(b.player_count.cmp(&a.player_count))
                .then(a.created_at.cmp(&b.created_at))
        });
        rooms
    }

    /// Subscribe to state change notifications for a room
    pub async fn subscribe(
        &self,
        room_id: &str,
        player_id: &str,
        sender: mpsc::Sender<StateChangeNotification>,
    ) -> Result<(), RoomError> {
        self.handle(room_id)
            .await?
            .send(RoomMessage::Subscribe {
                player_id: player_id.to_string(),
                sender,
            })
            .await
    }

    /// Unsubscribe from a room's notifications. Missing rooms are ignored.
    pub async fn unsubscribe(&self, room_id: &str, player_id: &str) {
        if let Some(handle) = self.get_room(room_id).await {
            let _ = handle
                .send(RoomMessage::Unsubscribe {
                    player_id: player_id.to_string(),
                })
                .await;
        }
    }

    /// Close a room regardless of who is seated
    pub async fn close_room(&self, room_id: &str) -> Result<(), RoomError> {
        let handle = self.handle(room_id).await?;
        // An actor that already stopped is as good as closed.
        let _ = handle
            .request(|response| RoomMessage::Close { response })
            .await;

        self.rooms.write().await.remove(room_id);
        self.listings.write().await.remove(room_id);
        log::info!("Closed {} room {}", R::GAME, room_id);
        Ok(())
    }

    /// Number of live rooms
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Evict empty rooms older than the retention window
    ///
    /// # Returns
    ///
    /// * `usize` - Number of rooms removed
    pub async fn cleanup_idle_rooms(&self) -> usize {
        self.cleanup_idle_rooms_at(Utc::now()).await
    }

    /// [`cleanup_idle_rooms`](Self::cleanup_idle_rooms) against a fixed clock
    pub async fn cleanup_idle_rooms_at(&self, now: DateTime<Utc>) -> usize {
        let candidates: Vec<RoomId> = self
            .listings
            .read()
            .await
            .values()
            .filter(|room| room.player_count == 0 && now - room.created_at >= self.retention)
            .map(|room| room.id.clone())
            .collect();

        let mut removed = 0;
        for room_id in candidates {
            if self.close_if_empty(&room_id).await {
                removed += 1;
            }
        }

        if removed > 0 {
            log::info!("Idle sweep removed {} {} rooms", removed, R::GAME);
        }
        removed
    }

    /// Close a room if nobody is seated. The write lock is held across the
    /// check so a concurrent join cannot land in a room being torn down.
    async fn close_if_empty(&self, room_id: &str) -> bool {
        let mut rooms = self.rooms.write().await;
        let Some(handle) = rooms.get(room_id) else {
            return false;
        };

        let closed = handle
            .request(|response| RoomMessage::CloseIfEmpty { response })
            .await
            .unwrap_or(true);
        if !closed {
            return false;
        }

        rooms.remove(room_id);
        drop(rooms);
        self.listings.write().await.remove(room_id);
        log::info!("Removed empty {} room {}", R::GAME, room_id);
        true
    }

    /// Run a variant specific operation inside the room's actor
    pub(crate) async fn with_room<T, F>(&self, room_id: &str, f: F) -> Result<T, RoomError>
    where
        T: Send + 'static,
        F: FnOnce(&mut R) -> Result<T, RoomError> + Send + 'static,
    {
        let handle = self.handle(room_id).await?;
        let (tx, rx) = oneshot::channel();
        handle
            .send(RoomMessage::Execute {
                op: Box::new(move |room: &mut R| {
                    let result = f(room);
                    let changed = result.is_ok();
                    let _ = tx.send(result);
                    changed
                }),
            })
            .await?;

        let result = rx.await.map_err(|_| RoomError::RoomClosed)?;
        self.refresh_listing(&handle).await;
        result
    }

    async fn refresh_listing(&self, handle: &RoomHandle<R>) {
        if let Ok(summary) = handle
            .request(|response| RoomMessage::GetSummary { response })
            .await
        {
            let mut listings = self.listings.write().await;
            if let Some(entry) = listings.get_mut(&summary.id) {
                *entry = summary;
            }
        }
    }
}

impl RoomManager<HoldemRoom> {
    /// Pay out the pot of a hand that reached showdown
    pub async fn evaluate_winner(&self, room_id: &str) -> Result<ShowdownResult, RoomError> {
        self.with_room(room_id, HoldemRoom::evaluate_winner).await
    }

    /// Deal the next hand once the last one is settled
    pub async fn start_new_hand(&self, room_id: &str) -> Result<(), RoomError> {
        self.with_room(room_id, HoldemRoom::start_new_hand).await
    }
}

impl RoomManager<BsRoom> {
    /// Deal the next round after a challenge
    pub async fn continue_to_next_round(&self, room_id: &str) -> Result<BsAdvance, RoomError> {
        self.with_room(room_id, BsRoom::continue_to_next_round).await
    }
}
