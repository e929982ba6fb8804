//! Room actor message types.

use tokio::sync::{mpsc, oneshot};

use super::{GameRoom, PlayerId, RoomError, RoomListItem};

/// A closure run against the room inside its actor. Returns whether the
/// room changed.
pub type RoomOp<R> = Box<dyn FnOnce(&mut R) -> bool + Send>;

/// Messages that can be sent to a [`RoomActor`](super::RoomActor)
pub enum RoomMessage<R: GameRoom> {
    /// Join request (password is checked inside the actor)
    Join {
        player_id: PlayerId,
        player_name: String,
        password: Option<String>,
        response: oneshot::Sender<Result<R::View, RoomError>>,
    },

    /// Leave request
    Leave {
        player_id: PlayerId,
        response: oneshot::Sender<LeaveResponse>,
    },

    /// Start the game
    StartGame {
        response: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Player move
    TakeAction {
        player_id: PlayerId,
        action: R::Action,
        response: oneshot::Sender<R::Outcome>,
    },

    /// Settle the hand or round, or begin the next one
    Advance {
        response: oneshot::Sender<Result<R::Advance, RoomError>>,
    },

    /// Projection for one player
    GetView {
        player_id: PlayerId,
        response: oneshot::Sender<R::View>,
    },

    /// Listing entry
    GetSummary {
        response: oneshot::Sender<RoomListItem>,
    },

    /// Run a variant specific operation
    Execute { op: RoomOp<R> },

    /// Subscribe to state change notifications
    Subscribe {
        player_id: PlayerId,
        sender: mpsc::Sender<StateChangeNotification>,
    },

    /// Unsubscribe from state change notifications
    Unsubscribe { player_id: PlayerId },

    /// Close the room only if nobody is seated. Replies whether it closed.
    CloseIfEmpty { response: oneshot::Sender<bool> },

    /// Close the room unconditionally
    Close { response: oneshot::Sender<()> },
}

/// Notification sent when room state changes
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StateChangeNotification {
    /// Game state changed (action taken, new hand, round settled)
    StateChanged,
    /// Player joined or left
    PlayerListChanged,
    /// Room was closed
    Closed,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LeaveResponse {
    /// Whether the player was seated
    pub removed: bool,
    /// Players left afterwards
    pub remaining: usize,
}
