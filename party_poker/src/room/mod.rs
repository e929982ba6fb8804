//! Room module providing multi-room support with an async actor model.
//!
//! This module implements:
//! - [`GameRoom`]: the state machine contract both game variants satisfy
//! - [`HoldemRoom`] and [`BsRoom`]: the Texas Hold'em and BS Poker rooms
//! - [`RoomActor`]: async actor owning a single room
//! - [`RoomManager`]: registry spawning and routing to room actors
//!
//! ## Architecture
//!
//! Each room runs in its own Tokio task with an mpsc inbox, so every
//! operation on a room is applied strictly one at a time. The manager keeps
//! a handle per room plus a listing cache used for public room discovery.
//!
//! ## Example
//!
//! ```
//! use party_poker::room::{HoldemRoomManager, RoomOptions};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let manager = HoldemRoomManager::new();
//! let room = manager
//!     .create_room("alice", RoomOptions::default())
//!     .await
//!     .unwrap();
//!
//! manager.join_room("alice", &room.id, None, "Alice").await.unwrap();
//! manager.join_room("bob", &room.id, None, "Bob").await.unwrap();
//! manager.start_game(&room.id).await.unwrap();
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::Debug;
use thiserror::Error;

pub mod actor;
pub mod bs;
pub mod config;
pub mod holdem;
pub mod manager;
pub mod messages;

pub use actor::{RoomActor, RoomHandle};
pub use bs::{BsAction, BsAdvance, BsOutcome, BsPhase, BsPlayer, BsRoom, BsView, RoundResult};
pub use config::{RoomConfig, RoomOptions, TableStakes};
pub use holdem::{
    ActionError, ActionResult, HoldemAction, HoldemAdvance, HoldemPhase, HoldemPlayer, HoldemRoom,
    HoldemView, ShowdownResult,
};
pub use manager::{BsRoomManager, HoldemRoomManager, RoomManager};
pub use messages::{LeaveResponse, RoomMessage, StateChangeNotification};

/// Short human-friendly room code, e.g. `PUB-7K3QZP`.
pub type RoomId = String;

/// Opaque player identifier supplied by the transport layer.
pub type PlayerId = String;

/// Coarse room lifecycle.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Playing,
    Finished,
}

impl RoomStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Playing => "playing",
            Self::Finished => "finished",
        }
    }
}

/// Errors from room lifecycle and game operations.
///
/// The display strings are what clients see.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RoomError {
    #[error("Room not found")]
    RoomNotFound,
    #[error("Invalid password")]
    InvalidPassword,
    #[error("Room is full")]
    RoomFull,
    #[error("Already in room")]
    AlreadyInRoom,
    #[error("Failed to join room")]
    JoinFailed,
    #[error("Game already in progress")]
    GameInProgress,
    #[error("Need at least 2 players to start")]
    NotEnoughPlayers,
    #[error("No game in progress")]
    NoGameInProgress,
    #[error("Not in bidding phase")]
    NotInBiddingPhase,
    #[error("Player not found")]
    PlayerNotFound,
    #[error("Not your turn")]
    NotYourTurn,
    #[error("Invalid guess")]
    InvalidGuess,
    #[error("Guess must be higher than the current guess")]
    GuessNotHigher,
    #[error("No guess to call bullshit on")]
    NoGuessToChallenge,
    #[error("Caller not found")]
    CallerNotFound,
    #[error("Guesser not found")]
    GuesserNotFound,
    #[error("Round is not over")]
    RoundNotOver,
    #[error("Hand is not at showdown")]
    NotAtShowdown,
    #[error("Invalid room configuration: {0}")]
    InvalidConfig(String),
    #[error("Room is closed")]
    RoomClosed,
}

impl Serialize for RoomError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Public listing entry for a room.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RoomListItem {
    pub id: RoomId,
    pub name: String,
    pub game: &'static str,
    pub player_count: usize,
    pub max_players: usize,
    pub status: RoomStatus,
    pub is_public: bool,
    pub has_password: bool,
    pub created_at: DateTime<Utc>,
}

/// A game room: one seated group of players and the game state between them.
///
/// Implementations are plain synchronous state machines. Concurrency lives
/// in [`RoomActor`], which owns exactly one room and applies messages to it
/// in arrival order.
pub trait GameRoom: Send + 'static {
    /// Variant specific creation settings.
    type Settings: Clone + Debug + Default + Send + Sync + 'static;
    /// A player move.
    type Action: Debug + Send + 'static;
    /// Result of a player move, returned to the mover.
    type Outcome: Debug + Send + 'static;
    /// Result of moving the room on between hands or rounds.
    type Advance: Debug + Send + 'static;
    /// Per-player projection of the room.
    type View: Debug + Send + 'static;

    /// Short game tag used in listings and logs.
    const GAME: &'static str;

    /// Most seats a room of this variant can hold.
    const MAX_SEATS: usize;

    fn new(config: RoomConfig, settings: Self::Settings) -> Self;

    /// Reject settings the variant cannot play with.
    fn validate_settings(_settings: &Self::Settings) -> Result<(), RoomError> {
        Ok(())
    }

    fn config(&self) -> &RoomConfig;

    fn status(&self) -> RoomStatus;

    fn player_count(&self) -> usize;

    fn has_player(&self, player_id: &str) -> bool;

    /// Seat a new player. Passwords are checked by the caller.
    fn add_player(&mut self, player_id: &str, player_name: &str) -> Result<(), RoomError>;

    /// Remove a player, repairing turn order. Returns whether anyone was
    /// removed.
    fn remove_player(&mut self, player_id: &str) -> bool;

    fn start_game(&mut self) -> Result<(), RoomError>;

    fn handle_action(&mut self, player_id: &str, action: Self::Action) -> Self::Outcome;

    /// Whether an outcome changed room state (and should be broadcast).
    fn is_accepted(outcome: &Self::Outcome) -> bool;

    /// Settle the current hand or round, or begin the next one.
    fn advance(&mut self) -> Result<Self::Advance, RoomError>;

    /// State as seen by `player_id`. Unknown ids get a spectator view.
    fn view_for(&self, player_id: &str) -> Self::View;

    fn summary(&self) -> RoomListItem {
        let config = self.config();
        RoomListItem {
            id: config.id.clone(),
            name: config.name.clone(),
            game: Self::GAME,
            player_count: self.player_count(),
            max_players: config.max_players,
            status: self.status(),
            is_public: config.is_public,
            has_password: config.has_password(),
            created_at: config.created_at,
        }
    }
}
