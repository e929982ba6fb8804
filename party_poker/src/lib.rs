//! # Party Poker
//!
//! Room-based game engine for two party card games played over the network:
//! Texas Hold'em and BS Poker (a bluffing game where players make escalating
//! claims about the pooled cards of every player, with twos wild).
//!
//! ## Architecture
//!
//! The crate splits into a pure game layer and a room layer on top of it.
//!
//! - [`game`]: deck management, the Hold'em hand evaluator and the BS Poker
//!   guess evaluator. No I/O, no async.
//! - [`room`]: per-room state machines for both variants, each owned by an
//!   async actor, and a manager per variant that creates, lists, routes to
//!   and sweeps rooms.
//!
//! Transports (the reference server lives in `pp_server`) only ever talk to
//! a [`HoldemRoomManager`] or a [`BsRoomManager`].
//!
//! ## Example
//!
//! ```
//! use party_poker::game::{
//!     entities::{Card, Rank, Suit},
//!     functional::evaluate_hand,
//! };
//!
//! let hand = [
//!     Card::new(Rank::Ace, Suit::Spade),
//!     Card::new(Rank::King, Suit::Spade),
//!     Card::new(Rank::Queen, Suit::Spade),
//!     Card::new(Rank::Jack, Suit::Spade),
//!     Card::new(Rank::Ten, Suit::Spade),
//! ];
//! assert_eq!(evaluate_hand(&hand).name, "Royal Flush");
//! ```

/// Cards, deck and hand evaluation.
pub mod game;
pub use game::{bluff, entities, functional};

/// Rooms, room actors and room managers.
pub mod room;
pub use room::{
    BsRoom, BsRoomManager, GameRoom, HoldemRoom, HoldemRoomManager, RoomError, RoomListItem,
    RoomOptions, RoomStatus, TableStakes,
};
