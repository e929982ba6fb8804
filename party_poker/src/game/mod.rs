//! Card primitives and the two hand evaluators.
//!
//! - [`entities`]: cards, ranks, suits and the deck
//! - [`functional`]: Texas Hold'em hand ranking and comparison
//! - [`bluff`]: BS Poker guesses, guess ordering and wild-card verification

pub mod bluff;
pub mod entities;
pub mod functional;
