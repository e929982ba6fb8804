//! BS Poker room: escalating hand claims over the pooled cards of every
//! seated player, settled by a "bullshit" call.
//!
//! Each player starts a game holding two cards. The loser of every challenge
//! is dealt one more card the next round and deals it; reaching six cards
//! eliminates a player. The last player standing wins.

use serde::{Deserialize, Serialize};

use super::{GameRoom, PlayerId, RoomError, RoomListItem, RoomStatus, config::RoomConfig};
use crate::game::{
    bluff::{HandGuess, is_higher_guess, verify_guess},
    entities::{Card, Deck},
};

/// Seat limit for BS rooms. Ten players at five cards each stay under 52.
pub const BS_MAX_SEATS: usize = 10;

pub const STARTING_CARD_COUNT: usize = 2;

/// Card count at which a player is out.
pub const ELIMINATION_CARD_COUNT: usize = 6;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BsPhase {
    Waiting,
    Dealing,
    Bidding,
    Reveal,
    RoundEnd,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BsPlayer {
    pub id: PlayerId,
    pub name: String,
    pub cards: Vec<Card>,
    pub card_count: usize,
    pub has_lost: bool,
    /// Seat index.
    pub position: usize,
}

impl BsPlayer {
    fn new(id: &str, name: &str, position: usize) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            cards: Vec::new(),
            card_count: STARTING_CARD_COUNT,
            has_lost: false,
            position,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct GuessRecord {
    pub player_id: PlayerId,
    pub player_name: String,
    pub guess: HandGuess,
}

/// Outcome of a bullshit call.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RoundResult {
    pub round_number: u32,
    pub caller_id: PlayerId,
    pub caller_name: String,
    pub guesser_id: PlayerId,
    pub guesser_name: String,
    pub guess: HandGuess,
    /// Whether the challenged hand was really there.
    pub exists: bool,
    /// The cards that make the hand, when it exists.
    pub hand: Vec<Card>,
    pub loser_id: PlayerId,
    pub loser_name: String,
    pub loser_card_count: usize,
    pub eliminated: bool,
}

#[derive(Clone, Debug)]
pub struct BsState {
    pub current_player_index: usize,
    pub dealer_index: usize,
    pub phase: BsPhase,
    pub current_guess: Option<HandGuess>,
    pub guess_history: Vec<GuessRecord>,
    pub all_cards: Vec<Card>,
    pub round_number: u32,
    pub last_result: Option<RoundResult>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BsAction {
    Guess { guess: HandGuess },
    Bullshit,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BsOutcome {
    GuessAccepted {
        guess: HandGuess,
        next_player_index: usize,
    },
    Challenge(RoundResult),
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BsAdvance {
    NextRound { round_number: u32 },
    Finished { winner_id: Option<PlayerId> },
}

#[derive(Clone, Debug, Serialize)]
pub struct BsPlayerView {
    pub id: PlayerId,
    pub name: String,
    pub card_count: usize,
    pub has_lost: bool,
    pub position: usize,
    /// `None` when hidden from the viewer.
    pub cards: Option<Vec<Card>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BsTableView {
    pub current_player_index: usize,
    pub dealer_index: usize,
    pub phase: BsPhase,
    pub current_guess: Option<HandGuess>,
    pub guess_history: Vec<GuessRecord>,
    /// The whole pool, only once a round is revealed.
    pub all_cards: Option<Vec<Card>>,
    pub total_cards: usize,
    pub round_number: u32,
    pub last_result: Option<RoundResult>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BsView {
    pub room: RoomListItem,
    pub players: Vec<BsPlayerView>,
    pub game: Option<BsTableView>,
    pub winner_id: Option<PlayerId>,
}

/// First seat clockwise after `from` still in the game.
fn next_active(players: &[BsPlayer], from: usize) -> Option<usize> {
    let n = players.len();
    (1..=n)
        .map(|step| (from + step) % n)
        .find(|&i| !players[i].has_lost)
}

#[derive(Debug)]
pub struct BsRoom {
    config: RoomConfig,
    players: Vec<BsPlayer>,
    game: Option<BsState>,
    status: RoomStatus,
    winner_id: Option<PlayerId>,
}

impl BsRoom {
    pub fn players(&self) -> &[BsPlayer] {
        &self.players
    }

    pub fn game(&self) -> Option<&BsState> {
        self.game.as_ref()
    }

    pub fn winner_id(&self) -> Option<&str> {
        self.winner_id.as_deref()
    }

    fn index_of(&self, player_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    fn active_players(&self) -> usize {
        self.players.iter().filter(|p| !p.has_lost).count()
    }

    /// End the game if at most one player is left standing.
    fn check_for_winner(&mut self) -> bool {
        if self.active_players() > 1 {
            return false;
        }

        self.status = RoomStatus::Finished;
        self.winner_id = self
            .players
            .iter()
            .find(|p| !p.has_lost)
            .map(|p| p.id.clone());
        log::info!(
            "Room {}: game over, winner {}",
            self.config.id,
            self.winner_id.as_deref().unwrap_or("none")
        );
        true
    }

    /// Deal a fresh round: every remaining player gets as many cards as
    /// they are carrying and the seat after the dealer opens the bidding.
    pub fn start_new_round(&mut self) -> Result<(), RoomError> {
        let game = self.game.as_mut().ok_or(RoomError::NoGameInProgress)?;
        game.phase = BsPhase::Dealing;

        let mut deck = Deck::shuffled();
        let mut pool = Vec::new();
        for player in &mut self.players {
            player.cards = if player.has_lost {
                Vec::new()
            } else {
                deck.deal(player.card_count)
            };
            pool.extend_from_slice(&player.cards);
        }

        game.all_cards = pool;
        game.current_guess = None;
        game.guess_history.clear();
        game.last_result = None;
        game.round_number += 1;
        game.current_player_index =
            next_active(&self.players, game.dealer_index).unwrap_or(game.dealer_index);
        game.phase = BsPhase::Bidding;

        log::info!(
            "Room {}: round {} dealt, {} cards in play",
            self.config.id,
            game.round_number,
            game.all_cards.len()
        );
        Ok(())
    }

    /// Record a guess from the current player, who must outbid the standing
    /// guess.
    pub fn make_guess(
        &mut self,
        player_id: &str,
        guess: HandGuess,
    ) -> Result<BsOutcome, RoomError> {
        let idx = self.check_turn(player_id)?;

        // Descriptions from clients are not trusted.
        let guess = HandGuess::new(guess.hand_type, guess.rank);
        if !guess.is_valid() {
            return Err(RoomError::InvalidGuess);
        }

        let game = self.game.as_mut().ok_or(RoomError::NoGameInProgress)?;
        if let Some(current) = &game.current_guess
            && !is_higher_guess(&guess, current)
        {
            return Err(RoomError::GuessNotHigher);
        }

        let player = &self.players[idx];
        game.current_guess = Some(guess.clone());
        game.guess_history.push(GuessRecord {
            player_id: player.id.clone(),
            player_name: player.name.clone(),
            guess: guess.clone(),
        });
        game.current_player_index = next_active(&self.players, idx).unwrap_or(idx);

        log::debug!("Room {}: {} guesses {}", self.config.id, player.name, guess);
        Ok(BsOutcome::GuessAccepted {
            guess,
            next_player_index: game.current_player_index,
        })
    }

    /// Challenge the standing guess. Whoever was wrong takes a card and
    /// deals the next round.
    pub fn call_bullshit(&mut self, caller_id: &str) -> Result<RoundResult, RoomError> {
        self.check_turn(caller_id)?;

        let game = self.game.as_ref().ok_or(RoomError::NoGameInProgress)?;
        let guess = game
            .current_guess
            .clone()
            .ok_or(RoomError::NoGuessToChallenge)?;
        let last = game
            .guess_history
            .last()
            .ok_or(RoomError::NoGuessToChallenge)?;
        let caller = self.index_of(caller_id).ok_or(RoomError::CallerNotFound)?;
        let guesser = self
            .index_of(&last.player_id)
            .ok_or(RoomError::GuesserNotFound)?;

        let verification = verify_guess(&game.all_cards, &guess);
        let round_number = game.round_number;
        let loser = if verification.exists { caller } else { guesser };

        let loser_player = &mut self.players[loser];
        loser_player.card_count += 1;
        if loser_player.card_count >= ELIMINATION_CARD_COUNT {
            loser_player.has_lost = true;
        }

        let result = RoundResult {
            round_number,
            caller_id: self.players[caller].id.clone(),
            caller_name: self.players[caller].name.clone(),
            guesser_id: self.players[guesser].id.clone(),
            guesser_name: self.players[guesser].name.clone(),
            guess,
            exists: verification.exists,
            hand: verification.hand,
            loser_id: self.players[loser].id.clone(),
            loser_name: self.players[loser].name.clone(),
            loser_card_count: self.players[loser].card_count,
            eliminated: self.players[loser].has_lost,
        };

        if let Some(game) = self.game.as_mut() {
            game.phase = BsPhase::Reveal;
            game.dealer_index = loser;
            game.last_result = Some(result.clone());
            game.phase = BsPhase::RoundEnd;
        }

        log::info!(
            "Room {}: {} called bullshit on {} ({}), {} loses",
            self.config.id,
            result.caller_name,
            result.guesser_name,
            result.guess,
            result.loser_name
        );

        self.check_for_winner();
        Ok(result)
    }

    /// Deal the next round once the last one has been settled.
    pub fn continue_to_next_round(&mut self) -> Result<BsAdvance, RoomError> {
        let game = self.game.as_ref().ok_or(RoomError::NoGameInProgress)?;
        if game.phase != BsPhase::RoundEnd {
            return Err(RoomError::RoundNotOver);
        }

        if self.status == RoomStatus::Finished || self.check_for_winner() {
            return Ok(BsAdvance::Finished {
                winner_id: self.winner_id.clone(),
            });
        }

        self.start_new_round()?;
        Ok(BsAdvance::NextRound {
            round_number: self.game.as_ref().map_or(0, |g| g.round_number),
        })
    }

    /// Shared guards for bidding moves. Returns the mover's seat.
    fn check_turn(&self, player_id: &str) -> Result<usize, RoomError> {
        let game = match &self.game {
            Some(game) if self.status == RoomStatus::Playing => game,
            _ => return Err(RoomError::NoGameInProgress),
        };
        if game.phase != BsPhase::Bidding {
            return Err(RoomError::NotInBiddingPhase);
        }

        let idx = self.index_of(player_id).ok_or(RoomError::PlayerNotFound)?;
        if idx != game.current_player_index {
            return Err(RoomError::NotYourTurn);
        }
        Ok(idx)
    }
}

impl GameRoom for BsRoom {
    type Settings = ();
    type Action = BsAction;
    type Outcome = Result<BsOutcome, RoomError>;
    type Advance = BsAdvance;
    type View = BsView;

    const GAME: &'static str = "bs_poker";
    const MAX_SEATS: usize = BS_MAX_SEATS;

    fn new(config: RoomConfig, _settings: ()) -> Self {
        Self {
            config,
            players: Vec::new(),
            game: None,
            status: RoomStatus::Waiting,
            winner_id: None,
        }
    }

    fn config(&self) -> &RoomConfig {
        &self.config
    }

    fn status(&self) -> RoomStatus {
        self.status
    }

    fn player_count(&self) -> usize {
        self.players.len()
    }

    fn has_player(&self, player_id: &str) -> bool {
        self.index_of(player_id).is_some()
    }

    fn add_player(&mut self, player_id: &str, player_name: &str) -> Result<(), RoomError> {
        if self.has_player(player_id) {
            return Err(RoomError::AlreadyInRoom);
        }
        if self.players.len() >= self.config.max_players {
            return Err(RoomError::RoomFull);
        }
        if self.status == RoomStatus::Playing {
            return Err(RoomError::GameInProgress);
        }

        let position = self.players.len();
        self.players
            .push(BsPlayer::new(player_id, player_name, position));
        log::info!(
            "Room {}: {} joined ({}/{})",
            self.config.id,
            player_name,
            self.players.len(),
            self.config.max_players
        );
        Ok(())
    }

    fn remove_player(&mut self, player_id: &str) -> bool {
        let Some(idx) = self.index_of(player_id) else {
            return false;
        };
        let removed = self.players.remove(idx);
        for (seat, player) in self.players.iter_mut().enumerate() {
            player.position = seat;
        }
        log::info!("Room {}: {} left", self.config.id, removed.name);

        let n = self.players.len();
        if n == 0 {
            self.game = None;
            self.status = RoomStatus::Waiting;
            return true;
        }

        if self.status != RoomStatus::Playing {
            return true;
        }

        // Nobody could challenge a standing guess whose author is gone.
        let orphaned_guess = self.game.as_ref().is_some_and(|g| {
            g.phase == BsPhase::Bidding
                && g.guess_history
                    .last()
                    .is_some_and(|last| last.player_id == removed.id)
        });

        if let Some(game) = self.game.as_mut() {
            for card in &removed.cards {
                if let Some(at) = game.all_cards.iter().position(|c| c == card) {
                    game.all_cards.remove(at);
                }
            }

            if game.dealer_index > idx {
                game.dealer_index -= 1;
            } else if game.dealer_index == idx {
                game.dealer_index = (idx + n - 1) % n;
            }

            if game.current_player_index > idx {
                game.current_player_index -= 1;
            } else if game.current_player_index == idx {
                let previous = (idx + n - 1) % n;
                game.current_player_index = next_active(&self.players, previous).unwrap_or(0);
            }
        }

        if !removed.has_lost && self.check_for_winner() {
            return true;
        }

        if orphaned_guess && let Err(e) = self.start_new_round() {
            log::warn!(
                "Room {}: could not redeal after {} left: {}",
                self.config.id,
                removed.name,
                e
            );
        }
        true
    }

    fn start_game(&mut self) -> Result<(), RoomError> {
        if self.status == RoomStatus::Playing {
            return Err(RoomError::GameInProgress);
        }
        if self.players.len() < 2 {
            return Err(RoomError::NotEnoughPlayers);
        }

        for player in &mut self.players {
            player.cards.clear();
            player.card_count = STARTING_CARD_COUNT;
            player.has_lost = false;
        }
        self.winner_id = None;
        self.game = Some(BsState {
            current_player_index: 0,
            dealer_index: 0,
            phase: BsPhase::Waiting,
            current_guess: None,
            guess_history: Vec::new(),
            all_cards: Vec::new(),
            round_number: 0,
            last_result: None,
        });
        self.status = RoomStatus::Playing;
        log::info!(
            "Room {}: BS game started with {} players",
            self.config.id,
            self.players.len()
        );

        self.start_new_round()
    }

    fn handle_action(&mut self, player_id: &str, action: BsAction) -> Result<BsOutcome, RoomError> {
        match action {
            BsAction::Guess { guess } => self.make_guess(player_id, guess),
            BsAction::Bullshit => self.call_bullshit(player_id).map(BsOutcome::Challenge),
        }
    }

    fn is_accepted(outcome: &Result<BsOutcome, RoomError>) -> bool {
        outcome.is_ok()
    }

    fn advance(&mut self) -> Result<BsAdvance, RoomError> {
        self.continue_to_next_round()
    }

    fn view_for(&self, player_id: &str) -> BsView {
        let revealed = self
            .game
            .as_ref()
            .is_some_and(|g| matches!(g.phase, BsPhase::Reveal | BsPhase::RoundEnd));

        BsView {
            room: self.summary(),
            players: self
                .players
                .iter()
                .map(|p| BsPlayerView {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    card_count: p.card_count,
                    has_lost: p.has_lost,
                    position: p.position,
                    cards: (revealed || p.id == player_id).then(|| p.cards.clone()),
                })
                .collect(),
            game: self.game.as_ref().map(|g| BsTableView {
                current_player_index: g.current_player_index,
                dealer_index: g.dealer_index,
                phase: g.phase,
                current_guess: g.current_guess.clone(),
                guess_history: g.guess_history.clone(),
                all_cards: revealed.then(|| g.all_cards.clone()),
                total_cards: g.all_cards.len(),
                round_number: g.round_number,
                last_result: g.last_result.clone(),
            }),
            winner_id: self.winner_id.clone(),
        }
    }
}
