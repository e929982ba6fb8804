//! Texas Hold'em room: seating, blinds, betting rounds and showdown.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use super::{
    GameRoom, PlayerId, RoomError, RoomListItem, RoomStatus,
    config::{RoomConfig, TableStakes},
};
use crate::game::{
    entities::{Card, Chips, Deck},
    functional::{HandRanking, argmax, evaluate_holdem},
};

/// Seat limit for Hold'em rooms. Ten players use 20 hole cards plus five
/// community cards, well inside one deck.
pub const HOLDEM_MAX_SEATS: usize = 10;

/// Name given to a pot won because everyone else folded.
pub const WINNER_BY_DEFAULT: &str = "Winner by default";

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Dealer,
    SmallBlind,
    BigBlind,
    Player,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HoldemPhase {
    Waiting,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl HoldemPhase {
    /// Whether players are still acting in this phase.
    pub fn is_betting(self) -> bool {
        matches!(self, Self::Preflop | Self::Flop | Self::Turn | Self::River)
    }

    fn next(self) -> Self {
        match self {
            Self::Waiting => Self::Preflop,
            Self::Preflop => Self::Flop,
            Self::Flop => Self::Turn,
            Self::Turn => Self::River,
            Self::River | Self::Showdown => Self::Showdown,
        }
    }

    /// Community cards revealed on entering this phase.
    fn cards_to_deal(self) -> usize {
        match self {
            Self::Flop => 3,
            Self::Turn | Self::River => 1,
            _ => 0,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HoldemPlayer {
    pub id: PlayerId,
    pub name: String,
    pub chips: Chips,
    /// Chips committed in the current betting round.
    pub current_bet: Chips,
    pub hole_cards: Vec<Card>,
    pub folded: bool,
    pub all_in: bool,
    pub position: Position,
    pub last_action: Option<String>,
    /// Acted since the last bet or raise in this round.
    pub(crate) acted: bool,
}

impl HoldemPlayer {
    fn new(id: &str, name: &str, chips: Chips) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            chips,
            current_bet: 0,
            hole_cards: Vec::new(),
            folded: false,
            all_in: false,
            position: Position::Player,
            last_action: None,
            acted: false,
        }
    }

    fn can_act(&self) -> bool {
        !self.folded && !self.all_in
    }
}

/// One hand's table state.
#[derive(Clone, Debug)]
pub struct HoldemState {
    pub community_cards: Vec<Card>,
    pub pot: Chips,
    pub current_bet: Chips,
    pub current_player_index: usize,
    pub dealer_index: usize,
    pub phase: HoldemPhase,
    pub deck: Deck,
    pub hand_number: u32,
    pub result: Option<ShowdownResult>,
}

#[derive(Clone, Debug, Serialize)]
pub struct HandWinner {
    pub player_id: PlayerId,
    pub player_name: String,
    pub amount: Chips,
    pub hand_name: String,
    pub hand: Option<HandRanking>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ShowdownResult {
    pub hand_number: u32,
    pub pot: Chips,
    pub winners: Vec<HandWinner>,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HoldemAction {
    Fold,
    Check,
    Call,
    /// Raise to a total bet of `amount` for this round.
    Raise { amount: Chips },
    AllIn,
}

impl fmt::Display for HoldemAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fold => write!(f, "Fold"),
            Self::Check => write!(f, "Check"),
            Self::Call => write!(f, "Call"),
            Self::Raise { amount } => write!(f, "Raise to {amount}"),
            Self::AllIn => write!(f, "All-in"),
        }
    }
}

/// Reasons a Hold'em action is rejected.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum ActionError {
    #[error("Game not started")]
    GameNotStarted,
    #[error("Player not found")]
    PlayerNotFound,
    #[error("Not your turn")]
    NotYourTurn,
    #[error("Already folded")]
    AlreadyFolded,
    #[error("Cannot check, must call or raise")]
    CannotCheck,
    #[error("Not enough chips")]
    NotEnoughChips,
    #[error("Raise must be at least 2x current bet")]
    RaiseTooSmall,
    #[error("Invalid action")]
    InvalidAction,
}

impl Serialize for ActionError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct ActionResult {
    pub success: bool,
    pub error: Option<ActionError>,
}

impl ActionResult {
    fn accepted() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn rejected(error: ActionError) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HoldemAdvance {
    Settled(ShowdownResult),
    NewHand { hand_number: u32 },
}

#[derive(Clone, Debug, Serialize)]
pub struct HoldemPlayerView {
    pub id: PlayerId,
    pub name: String,
    pub chips: Chips,
    pub current_bet: Chips,
    /// `None` when hidden from the viewer.
    pub hole_cards: Option<Vec<Card>>,
    pub folded: bool,
    pub all_in: bool,
    pub position: Position,
    pub last_action: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct HoldemTableView {
    pub community_cards: Vec<Card>,
    pub pot: Chips,
    pub current_bet: Chips,
    pub current_player_index: usize,
    pub dealer_index: usize,
    pub phase: HoldemPhase,
    pub hand_number: u32,
    pub cards_remaining: usize,
    pub result: Option<ShowdownResult>,
}

#[derive(Clone, Debug, Serialize)]
pub struct HoldemView {
    pub room: RoomListItem,
    pub stakes: TableStakes,
    pub players: Vec<HoldemPlayerView>,
    pub game: Option<HoldemTableView>,
}

#[derive(Debug)]
pub struct HoldemRoom {
    config: RoomConfig,
    stakes: TableStakes,
    players: Vec<HoldemPlayer>,
    game: Option<HoldemState>,
    status: RoomStatus,
}

impl HoldemRoom {
    pub fn stakes(&self) -> &TableStakes {
        &self.stakes
    }

    pub fn players(&self) -> &[HoldemPlayer] {
        &self.players
    }

    pub fn game(&self) -> Option<&HoldemState> {
        self.game.as_ref()
    }

    fn index_of(&self, player_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    /// First seat clockwise after `from` matching `pred`.
    fn next_seat(&self, from: usize, pred: impl Fn(&HoldemPlayer) -> bool) -> Option<usize> {
        let n = self.players.len();
        (1..=n)
            .map(|step| (from + step) % n)
            .find(|&i| pred(&self.players[i]))
    }

    fn contenders(&self) -> usize {
        self.players.iter().filter(|p| !p.folded).count()
    }

    /// A hand is live from the deal until its pot is settled.
    fn hand_in_progress(&self) -> bool {
        self.game.as_ref().is_some_and(|g| {
            g.phase.is_betting() || (g.phase == HoldemPhase::Showdown && g.result.is_none())
        })
    }

    /// Deal a new hand: rotate the button, post blinds, deal hole cards.
    pub fn start_new_hand(&mut self) -> Result<(), RoomError> {
        if self.hand_in_progress() {
            return Err(RoomError::GameInProgress);
        }

        let funded = self.players.iter().filter(|p| p.chips > 0).count();
        if funded < 2 {
            return Err(RoomError::NotEnoughPlayers);
        }

        let dealer = match &self.game {
            Some(previous) => self.next_seat(previous.dealer_index, |p| p.chips > 0),
            None => self.players.iter().position(|p| p.chips > 0),
        }
        .ok_or(RoomError::NotEnoughPlayers)?;
        let small_blind = self
            .next_seat(dealer, |p| p.chips > 0)
            .ok_or(RoomError::NotEnoughPlayers)?;
        let big_blind = self
            .next_seat(small_blind, |p| p.chips > 0)
            .ok_or(RoomError::NotEnoughPlayers)?;

        for player in &mut self.players {
            player.current_bet = 0;
            player.hole_cards.clear();
            // Busted players sit the hand out.
            player.folded = player.chips == 0;
            player.all_in = false;
            player.position = Position::Player;
            player.last_action = None;
            player.acted = false;
        }
        self.players[dealer].position = Position::Dealer;
        self.players[small_blind].position = Position::SmallBlind;
        self.players[big_blind].position = Position::BigBlind;

        let mut pot = 0;
        pot += self.post_blind(small_blind, self.stakes.small_blind);
        pot += self.post_blind(big_blind, self.stakes.big_blind);

        let mut deck = Deck::shuffled();
        for player in self.players.iter_mut().filter(|p| !p.folded) {
            player.hole_cards = deck.deal(2);
        }

        let hand_number = self.game.as_ref().map_or(0, |g| g.hand_number) + 1;
        let current_player_index = self
            .next_seat(big_blind, HoldemPlayer::can_act)
            .unwrap_or(big_blind);

        self.game = Some(HoldemState {
            community_cards: Vec::new(),
            pot,
            current_bet: self.stakes.big_blind,
            current_player_index,
            dealer_index: dealer,
            phase: HoldemPhase::Preflop,
            deck,
            hand_number,
            result: None,
        });
        self.status = RoomStatus::Playing;

        log::info!(
            "Room {}: hand #{} dealt, dealer {} blinds {}/{}",
            self.config.id,
            hand_number,
            self.players[dealer].name,
            self.stakes.small_blind,
            self.stakes.big_blind
        );

        // Blinds alone can put everyone all-in.
        if self.betting_round_complete() {
            self.advance_phase();
        }

        Ok(())
    }

    /// Post a blind capped at the stack. Returns the amount posted.
    fn post_blind(&mut self, seat: usize, amount: Chips) -> Chips {
        let player = &mut self.players[seat];
        let posted = amount.min(player.chips);
        player.chips -= posted;
        player.current_bet = posted;
        if player.chips == 0 {
            player.all_in = true;
        }
        posted
    }

    fn try_action(&mut self, player_id: &str, action: HoldemAction) -> Result<(), ActionError> {
        let (table_bet, current_index, phase) = match &self.game {
            Some(g) if self.status == RoomStatus::Playing => {
                (g.current_bet, g.current_player_index, g.phase)
            }
            _ => return Err(ActionError::GameNotStarted),
        };
        if !phase.is_betting() {
            return Err(ActionError::InvalidAction);
        }

        let idx = self.index_of(player_id).ok_or(ActionError::PlayerNotFound)?;
        if idx != current_index {
            return Err(ActionError::NotYourTurn);
        }

        let player = &self.players[idx];
        if player.folded {
            return Err(ActionError::AlreadyFolded);
        }
        if player.all_in {
            return Err(ActionError::InvalidAction);
        }

        let owed = table_bet.saturating_sub(player.current_bet);
        let committed = match action {
            HoldemAction::Fold => 0,
            HoldemAction::Check => {
                if owed > 0 {
                    return Err(ActionError::CannotCheck);
                }
                0
            }
            HoldemAction::Call => {
                if player.chips < owed {
                    return Err(ActionError::NotEnoughChips);
                }
                owed
            }
            HoldemAction::Raise { amount } => {
                let minimum = table_bet.saturating_mul(2).max(self.stakes.big_blind);
                if amount < minimum || amount <= table_bet {
                    return Err(ActionError::RaiseTooSmall);
                }
                let delta = amount - player.current_bet;
                if delta > player.chips {
                    return Err(ActionError::NotEnoughChips);
                }
                delta
            }
            HoldemAction::AllIn => player.chips,
        };

        let Some(game) = self.game.as_mut() else {
            return Err(ActionError::GameNotStarted);
        };
        let player = &mut self.players[idx];
        player.chips -= committed;
        player.current_bet += committed;
        game.pot += committed;
        if player.chips == 0 && committed > 0 {
            player.all_in = true;
        }
        if action == HoldemAction::Fold {
            player.folded = true;
        }
        player.acted = true;
        player.last_action = Some(action.to_string());

        let reopened = player.current_bet > game.current_bet;
        if reopened {
            game.current_bet = player.current_bet;
            for (i, other) in self.players.iter_mut().enumerate() {
                if i != idx && other.can_act() {
                    other.acted = false;
                }
            }
        }

        log::debug!(
            "Room {}: {} -> {} (pot {})",
            self.config.id,
            player_id,
            action,
            self.game.as_ref().map_or(0, |g| g.pot)
        );

        self.progress();
        Ok(())
    }

    /// Betting is over when at most one contender remains, or when every
    /// player who can still act has acted and matched the table bet.
    fn betting_round_complete(&self) -> bool {
        let Some(game) = &self.game else {
            return true;
        };
        if self.contenders() <= 1 {
            return true;
        }

        let active: Vec<&HoldemPlayer> = self.players.iter().filter(|p| p.can_act()).collect();
        match active.as_slice() {
            [] => true,
            // Nobody left to bet against.
            [only] => only.current_bet >= game.current_bet,
            _ => active
                .iter()
                .all(|p| p.acted && p.current_bet == game.current_bet),
        }
    }

    /// Move the hand along after an accepted action or a departure.
    fn progress(&mut self) {
        if self.contenders() <= 1 {
            if let Some(game) = self.game.as_mut() {
                game.phase = HoldemPhase::Showdown;
            }
            return;
        }

        if self.betting_round_complete() {
            self.advance_phase();
            return;
        }

        let Some(current) = self.game.as_ref().map(|g| g.current_player_index) else {
            return;
        };
        if let Some(next) = self.next_seat(current, HoldemPlayer::can_act)
            && let Some(game) = self.game.as_mut()
        {
            game.current_player_index = next;
        }
    }

    /// Close the betting round and deal the next street. Streets with no
    /// possible betting are dealt straight through to showdown.
    fn advance_phase(&mut self) {
        loop {
            for player in &mut self.players {
                player.current_bet = 0;
                player.acted = false;
                player.last_action = None;
            }

            let Some(game) = self.game.as_mut() else {
                return;
            };
            game.current_bet = 0;
            game.phase = game.phase.next();

            if self.contenders() <= 1 {
                if let Some(game) = self.game.as_mut() {
                    game.phase = HoldemPhase::Showdown;
                }
                return;
            }

            let Some(game) = self.game.as_mut() else {
                return;
            };
            let street = game.deck.deal(game.phase.cards_to_deal());
            game.community_cards.extend(street);

            if game.phase == HoldemPhase::Showdown {
                log::debug!("Room {}: showdown", self.config.id);
                return;
            }

            let dealer = game.dealer_index;
            if let Some(first) = self.next_seat(dealer, HoldemPlayer::can_act)
                && let Some(game) = self.game.as_mut()
            {
                game.current_player_index = first;
            }

            if !self.betting_round_complete() {
                return;
            }
        }
    }

    /// Settle the pot at showdown. Ties split evenly, with odd chips going to
    /// the first winner clockwise from the dealer.
    pub fn evaluate_winner(&mut self) -> Result<ShowdownResult, RoomError> {
        let game = self.game.as_ref().ok_or(RoomError::NoGameInProgress)?;
        if game.phase != HoldemPhase::Showdown || game.result.is_some() {
            return Err(RoomError::NotAtShowdown);
        }

        let n = self.players.len();
        let dealer = game.dealer_index;
        let mut contenders: Vec<usize> = (0..n).filter(|&i| !self.players[i].folded).collect();
        contenders.sort_by_key(|&i| (i + n - dealer - 1) % n);
        if contenders.is_empty() {
            return Err(RoomError::NoGameInProgress);
        }

        let winners: Vec<(usize, Option<HandRanking>)> = if contenders.len() == 1 {
            vec![(contenders[0], None)]
        } else {
            let hands: Vec<HandRanking> = contenders
                .iter()
                .map(|&i| evaluate_holdem(&self.players[i].hole_cards, &game.community_cards))
                .collect();
            argmax(&hands)
                .into_iter()
                .map(|k| (contenders[k], Some(hands[k].clone())))
                .collect()
        };

        let pot = game.pot;
        let hand_number = game.hand_number;
        let share = pot / winners.len() as Chips;
        let remainder = pot % winners.len() as Chips;

        let mut paid = Vec::with_capacity(winners.len());
        for (k, (seat, hand)) in winners.into_iter().enumerate() {
            let amount = if k == 0 { share + remainder } else { share };
            let player = &mut self.players[seat];
            player.chips += amount;
            let hand_name = hand
                .as_ref()
                .map_or_else(|| WINNER_BY_DEFAULT.to_string(), |h| h.name.clone());
            log::info!(
                "Room {}: {} wins {} with {}",
                self.config.id,
                player.name,
                amount,
                hand_name
            );
            paid.push(HandWinner {
                player_id: player.id.clone(),
                player_name: player.name.clone(),
                amount,
                hand_name,
                hand,
            });
        }

        let result = ShowdownResult {
            hand_number,
            pot,
            winners: paid,
        };
        if let Some(game) = self.game.as_mut() {
            game.pot = 0;
            game.result = Some(result.clone());
        }

        if self.players.iter().filter(|p| p.chips > 0).count() < 2 {
            self.status = RoomStatus::Finished;
            log::info!("Room {}: game finished", self.config.id);
        }

        Ok(result)
    }

    fn player_view(&self, player: &HoldemPlayer, viewer: &str) -> HoldemPlayerView {
        let at_showdown = self
            .game
            .as_ref()
            .is_some_and(|g| g.phase == HoldemPhase::Showdown);
        let visible = player.id == viewer || (at_showdown && !player.folded);

        HoldemPlayerView {
            id: player.id.clone(),
            name: player.name.clone(),
            chips: player.chips,
            current_bet: player.current_bet,
            hole_cards: visible.then(|| player.hole_cards.clone()),
            folded: player.folded,
            all_in: player.all_in,
            position: player.position,
            last_action: player.last_action.clone(),
        }
    }
}

impl GameRoom for HoldemRoom {
    type Settings = TableStakes;
    type Action = HoldemAction;
    type Outcome = ActionResult;
    type Advance = HoldemAdvance;
    type View = HoldemView;

    const GAME: &'static str = "holdem";
    const MAX_SEATS: usize = HOLDEM_MAX_SEATS;

    fn new(config: RoomConfig, settings: TableStakes) -> Self {
        Self {
            config,
            stakes: settings,
            players: Vec::new(),
            game: None,
            status: RoomStatus::Waiting,
        }
    }

    fn validate_settings(settings: &TableStakes) -> Result<(), RoomError> {
        settings.validate()
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

        let mut player = HoldemPlayer::new(player_id, player_name, self.stakes.buy_in);
        // Mid-hand arrivals wait for the next deal.
        player.folded = self.hand_in_progress();
        self.players.push(player);

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

        // A decided but unpaid hand is paid out before the seat goes, so
        // the departing winner collects and the next hand can be dealt.
        if self
            .game
            .as_ref()
            .is_some_and(|g| g.phase == HoldemPhase::Showdown && g.result.is_none())
            && let Err(e) = self.evaluate_winner()
        {
            log::warn!(
                "Room {}: dropping unsettled hand as {} leaves: {}",
                self.config.id,
                player_id,
                e
            );
            self.game = None;
            self.status = RoomStatus::Waiting;
        }

        let was_live = self.hand_in_progress();
        let removed = self.players.remove(idx);
        let n = self.players.len();
        log::info!("Room {}: {} left", self.config.id, removed.name);

        if n == 0 {
            self.game = None;
            self.status = RoomStatus::Waiting;
            return true;
        }

        let mut was_current = false;
        if let Some(game) = self.game.as_mut() {
            // Keep the button where the departed seat was so it still
            // rotates to the next player.
            if game.dealer_index > idx {
                game.dealer_index -= 1;
            } else if game.dealer_index == idx {
                game.dealer_index = (idx + n - 1) % n;
            }

            if game.current_player_index > idx {
                game.current_player_index -= 1;
            } else if game.current_player_index == idx {
                was_current = true;
                game.current_player_index = (idx + n - 1) % n;
            }
        }

        if was_live && self.game.as_ref().is_some_and(|g| g.phase.is_betting()) {
            if self.contenders() <= 1 {
                // Hand abandoned: the last contender takes what is in the pot.
                let pot = self.game.as_ref().map_or(0, |g| g.pot);
                if let Some(winner) = self.players.iter_mut().find(|p| !p.folded) {
                    winner.chips += pot;
                    log::info!(
                        "Room {}: {} takes {} after {} left",
                        self.config.id,
                        winner.name,
                        pot,
                        removed.name
                    );
                }
                self.game = None;
                self.status = RoomStatus::Waiting;
                return true;
            }

            if self.betting_round_complete() {
                self.advance_phase();
            } else if was_current {
                let from = self.game.as_ref().map_or(0, |g| g.current_player_index);
                if let Some(next) = self.next_seat(from, HoldemPlayer::can_act)
                    && let Some(game) = self.game.as_mut()
                {
                    game.current_player_index = next;
                }
            }
        }

        if n < 2 && self.status == RoomStatus::Playing {
            // A lone player cannot keep playing; settle anything outstanding.
            if let Some(game) = self.game.take()
                && let Some(last) = self.players.first_mut()
            {
                last.chips += game.pot;
            }
            self.status = RoomStatus::Waiting;
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

        if self.status == RoomStatus::Finished
            || self.players.iter().filter(|p| p.chips > 0).count() < 2
        {
            // Fresh game: everyone buys back in.
            for player in &mut self.players {
                player.chips = self.stakes.buy_in;
            }
            self.game = None;
        }

        self.start_new_hand()
    }

    fn handle_action(&mut self, player_id: &str, action: HoldemAction) -> ActionResult {
        match self.try_action(player_id, action) {
            Ok(()) => ActionResult::accepted(),
            Err(error) => {
                log::debug!(
                    "Room {}: rejected {} from {}: {}",
                    self.config.id,
                    action,
                    player_id,
                    error
                );
                ActionResult::rejected(error)
            }
        }
    }

    fn is_accepted(outcome: &ActionResult) -> bool {
        outcome.success
    }

    fn advance(&mut self) -> Result<HoldemAdvance, RoomError> {
        if self
            .game
            .as_ref()
            .is_some_and(|g| g.phase == HoldemPhase::Showdown && g.result.is_none())
        {
            return self.evaluate_winner().map(HoldemAdvance::Settled);
        }

        if self.status != RoomStatus::Playing {
            return Err(RoomError::NoGameInProgress);
        }

        self.start_new_hand()?;
        Ok(HoldemAdvance::NewHand {
            hand_number: self.game.as_ref().map_or(0, |g| g.hand_number),
        })
    }

    fn view_for(&self, player_id: &str) -> HoldemView {
        HoldemView {
            room: self.summary(),
            stakes: self.stakes,
            players: self
                .players
                .iter()
                .map(|p| self.player_view(p, player_id))
                .collect(),
            game: self.game.as_ref().map(|g| HoldemTableView {
                community_cards: g.community_cards.clone(),
                pot: g.pot,
                current_bet: g.current_bet,
                current_player_index: g.current_player_index,
                dealer_index: g.dealer_index,
                phase: g.phase,
                hand_number: g.hand_number,
                cards_remaining: g.deck.len(),
                result: g.result.clone(),
            }),
        }
    }
}
