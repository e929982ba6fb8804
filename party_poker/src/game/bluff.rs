//! BS Poker guesses: bid ordering and existence checks against the pooled
//! cards of every seated player.
//!
//! Every 2 is wild unless the guess itself is about 2s, in which case 2s only
//! count as themselves.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entities::{Card, Rank, Suit, Value};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandType {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl HandType {
    /// Bid strength, 1 (high card) through 9 (straight flush).
    #[must_use]
    pub fn strength(self) -> u8 {
        self as u8 + 1
    }
}

impl fmt::Display for HandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::HighCard => "high card",
            Self::Pair => "pair",
            Self::TwoPair => "two pair",
            Self::ThreeOfAKind => "three of a kind",
            Self::Straight => "straight",
            Self::Flush => "flush",
            Self::FullHouse => "full house",
            Self::FourOfAKind => "four of a kind",
            Self::StraightFlush => "straight flush",
        };
        write!(f, "{repr}")
    }
}

/// A claim that a hand of `hand_type` keyed on `rank` can be made from the
/// pooled cards. A missing rank means "any rank".
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HandGuess {
    #[serde(rename = "type")]
    pub hand_type: HandType,
    #[serde(default)]
    pub rank: Option<Rank>,
    #[serde(default)]
    pub description: String,
}

impl HandGuess {
    #[must_use]
    pub fn new(hand_type: HandType, rank: Option<Rank>) -> Self {
        Self {
            hand_type,
            rank,
            description: describe(hand_type, rank),
        }
    }

    /// Straights are named by their top card, so nothing below a five.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match (self.hand_type, self.rank) {
            (HandType::Straight | HandType::StraightFlush, Some(rank)) => rank >= Rank::Five,
            _ => true,
        }
    }

    fn rank_value(&self) -> Value {
        self.rank.map_or(0, Rank::value)
    }
}

impl fmt::Display for HandGuess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)
    }
}

fn describe(hand_type: HandType, rank: Option<Rank>) -> String {
    let Some(rank) = rank else {
        return format!("Any {hand_type}");
    };
    match hand_type {
        HandType::HighCard => format!("{} high", rank.name()),
        HandType::Pair => format!("Pair of {}", rank.plural()),
        HandType::TwoPair => format!("Two pair, {} up", rank.plural()),
        HandType::ThreeOfAKind => format!("Three {}", rank.plural()),
        HandType::Straight => format!("Straight to the {}", rank.name()),
        HandType::Flush => format!("Flush with the {}", rank.name()),
        HandType::FullHouse => format!("{} full", rank.plural()),
        HandType::FourOfAKind => format!("Four {}", rank.plural()),
        HandType::StraightFlush => format!("Straight flush to the {}", rank.name()),
    }
}

/// True when `a` outbids `b`: a stronger hand type always wins, otherwise
/// the higher key rank does. Identical bids are not higher.
#[must_use]
pub fn is_higher_guess(a: &HandGuess, b: &HandGuess) -> bool {
    match a.hand_type.strength().cmp(&b.hand_type.strength()) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => a.rank_value() > b.rank_value(),
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct GuessVerification {
    pub exists: bool,
    /// Cards that make up the claimed hand, wilds included, when it exists.
    pub hand: Vec<Card>,
}

/// Check whether `guess` can be found in `all_cards`.
#[must_use]
pub fn verify_guess(all_cards: &[Card], guess: &HandGuess) -> GuessVerification {
    let wilds_enabled = guess.rank != Some(Rank::Two);
    let pool = Pool::new(all_cards, wilds_enabled);

    let found = match guess.hand_type {
        HandType::HighCard => pool.find_group(guess.rank, 1),
        HandType::Pair => pool.find_group(guess.rank, 2),
        HandType::ThreeOfAKind => pool.find_group(guess.rank, 3),
        HandType::FourOfAKind => pool.find_group(guess.rank, 4),
        HandType::TwoPair => pool.find_two_groups(guess.rank, 2),
        HandType::FullHouse => pool.find_two_groups(guess.rank, 3),
        HandType::Straight => pool.find_straight(guess.rank, None),
        HandType::Flush => pool.find_flush(guess.rank),
        HandType::StraightFlush => Suit::ALL
            .iter()
            .find_map(|&suit| pool.find_straight(guess.rank, Some(suit))),
    };

    match found {
        Some(hand) => GuessVerification { exists: true, hand },
        None => GuessVerification::default(),
    }
}

/// Cards split into naturals and wilds. Every `take_*` call is
/// all-or-nothing: on failure the pool is left as it was.
#[derive(Clone, Debug)]
struct Pool {
    naturals: Vec<Card>,
    wilds: Vec<Card>,
    wilds_enabled: bool,
}

impl Pool {
    fn new(cards: &[Card], wilds_enabled: bool) -> Self {
        let (wilds, naturals): (Vec<Card>, Vec<Card>) = cards
            .iter()
            .copied()
            .partition(|card| wilds_enabled && card.rank == Rank::Two);
        Self {
            naturals,
            wilds,
            wilds_enabled,
        }
    }

    /// Ranks a natural card can have, highest first.
    fn natural_ranks(&self) -> impl Iterator<Item = Rank> + '_ {
        Rank::ALL
            .iter()
            .rev()
            .copied()
            .filter(|&rank| !(self.wilds_enabled && rank == Rank::Two))
    }

    fn count_naturals(&self, pred: impl Fn(&Card) -> bool) -> usize {
        self.naturals.iter().filter(|card| pred(card)).count()
    }

    /// Take `count` cards matching `pred`, naturals first then wilds.
    fn take_matching(&mut self, count: usize, pred: impl Fn(&Card) -> bool) -> Option<Vec<Card>> {
        let natural_idx: Vec<usize> = self
            .naturals
            .iter()
            .enumerate()
            .filter(|(_, card)| pred(card))
            .map(|(idx, _)| idx)
            .take(count)
            .collect();
        let wilds_needed = count - natural_idx.len();
        if wilds_needed > self.wilds.len() {
            return None;
        }

        let mut taken: Vec<Card> = natural_idx
            .iter()
            .rev()
            .map(|&idx| self.naturals.remove(idx))
            .collect();
        taken.reverse();
        let keep = self.wilds.len() - wilds_needed;
        taken.extend(self.wilds.split_off(keep));
        Some(taken)
    }

    fn take_rank(&mut self, rank: Rank, count: usize) -> Option<Vec<Card>> {
        self.take_matching(count, |card| card.rank == rank)
    }

    /// Take a group of `count` same-rank cards of any rank not in `exclude`,
    /// using as few wilds as possible and preferring higher ranks.
    fn take_best_group(&mut self, count: usize, exclude: &[Rank]) -> Option<Vec<Card>> {
        let best = self
            .natural_ranks()
            .filter(|rank| !exclude.contains(rank))
            // Ties keep the first (highest) rank.
            .min_by_key(|&rank| count.saturating_sub(self.count_naturals(|c| c.rank == rank)))?;
        self.take_rank(best, count)
    }

    fn find_group(&self, rank: Option<Rank>, count: usize) -> Option<Vec<Card>> {
        let mut pool = self.clone();
        match rank {
            Some(rank) => pool.take_rank(rank, count),
            None => pool.take_best_group(count, &[]),
        }
    }

    /// A group of `first` cards keyed on `rank` plus a pair of another rank:
    /// two pair when `first` is 2, a full house when it is 3.
    fn find_two_groups(&self, rank: Option<Rank>, first: usize) -> Option<Vec<Card>> {
        let candidates: Vec<Rank> = match rank {
            Some(rank) => vec![rank],
            None => self.natural_ranks().collect(),
        };

        candidates.into_iter().find_map(|key| {
            let mut pool = self.clone();
            let mut hand = pool.take_rank(key, first)?;
            hand.extend(pool.take_best_group(2, &[key])?);
            Some(hand)
        })
    }

    /// Five consecutive ranks topped by `high` (any top when `None`),
    /// optionally all of one suit. The wheel counts as five-high; there is
    /// no wraparound past the ace.
    fn find_straight(&self, high: Option<Rank>, suit: Option<Suit>) -> Option<Vec<Card>> {
        let tops: Vec<Value> = match high {
            Some(rank) => vec![rank.value()],
            None => (5..=14).rev().collect(),
        };

        tops.into_iter().find_map(|top| {
            if top < 5 {
                return None;
            }
            let mut pool = self.clone();
            let mut hand = Vec::with_capacity(5);
            for value in (top - 4..=top).rev() {
                let rank = Rank::from_value(value)?;
                let card = pool.take_matching(1, |card| {
                    card.rank == rank && suit.is_none_or(|s| card.suit == s)
                })?;
                hand.extend(card);
            }
            Some(hand)
        })
    }

    /// Five cards of one suit, including `rank` when given.
    fn find_flush(&self, rank: Option<Rank>) -> Option<Vec<Card>> {
        Suit::ALL.iter().find_map(|&suit| {
            let mut pool = self.clone();
            let mut hand = match rank {
                Some(rank) => pool.take_matching(1, |c| c.rank == rank && c.suit == suit)?,
                None => Vec::new(),
            };
            let rest = 5 - hand.len();
            hand.extend(pool.take_matching(rest, |c| c.suit == suit)?);
            Some(hand)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    fn guess(hand_type: HandType, rank: Rank) -> HandGuess {
        HandGuess::new(hand_type, Some(rank))
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(guess(HandType::Pair, Rank::King).description, "Pair of Kings");
        assert_eq!(guess(HandType::FullHouse, Rank::Nine).description, "Nines full");
        assert_eq!(HandGuess::new(HandType::Flush, None).description, "Any flush");
    }

    #[test]
    fn test_strength_ordinals() {
        assert_eq!(HandType::HighCard.strength(), 1);
        assert_eq!(HandType::StraightFlush.strength(), 9);
    }

    #[test]
    fn test_higher_type_beats_any_rank() {
        let low_trips = guess(HandType::ThreeOfAKind, Rank::Three);
        let ace_pair = guess(HandType::Pair, Rank::Ace);
        assert!(is_higher_guess(&low_trips, &ace_pair));
        assert!(!is_higher_guess(&ace_pair, &low_trips));
    }

    #[test]
    fn test_same_type_compares_rank() {
        let kings = guess(HandType::Pair, Rank::King);
        let queens = guess(HandType::Pair, Rank::Queen);
        assert!(is_higher_guess(&kings, &queens));
        assert!(!is_higher_guess(&queens, &kings));
    }

    #[test]
    fn test_identical_guess_is_not_higher() {
        let a = guess(HandType::Straight, Rank::Nine);
        assert!(!is_higher_guess(&a, &a.clone()));
    }

    #[test]
    fn test_ranked_guess_beats_unranked_of_same_type() {
        let any = HandGuess::new(HandType::Pair, None);
        let twos = guess(HandType::Pair, Rank::Two);
        assert!(is_higher_guess(&twos, &any));
    }

    #[test]
    fn test_low_straight_is_invalid() {
        assert!(!guess(HandType::Straight, Rank::Four).is_valid());
        assert!(guess(HandType::Straight, Rank::Five).is_valid());
        assert!(guess(HandType::Pair, Rank::Two).is_valid());
    }

    #[test]
    fn test_wild_completes_pair() {
        let pool = [
            c(Rank::Two, Suit::Spade),
            c(Rank::Two, Suit::Heart),
            c(Rank::Seven, Suit::Diamond),
            c(Rank::Nine, Suit::Club),
        ];
        let result = verify_guess(&pool, &guess(HandType::Pair, Rank::Nine));
        assert!(result.exists);
        assert_eq!(result.hand.len(), 2);
        assert_eq!(result.hand[0], c(Rank::Nine, Suit::Club));
        assert_eq!(result.hand[1].rank, Rank::Two);
    }

    #[test]
    fn test_missing_pair_without_wilds() {
        let pool = [
            c(Rank::Three, Suit::Spade),
            c(Rank::Seven, Suit::Diamond),
            c(Rank::Nine, Suit::Club),
            c(Rank::Queen, Suit::Heart),
        ];
        let result = verify_guess(&pool, &guess(HandType::Pair, Rank::King));
        assert!(!result.exists);
        assert!(result.hand.is_empty());
    }

    #[test]
    fn test_guess_on_twos_uses_only_real_twos() {
        let one_two = [c(Rank::Two, Suit::Spade), c(Rank::Nine, Suit::Club)];
        assert!(!verify_guess(&one_two, &guess(HandType::Pair, Rank::Two)).exists);
        assert!(verify_guess(&one_two, &guess(HandType::HighCard, Rank::Two)).exists);

        let two_twos = [c(Rank::Two, Suit::Spade), c(Rank::Two, Suit::Club)];
        assert!(verify_guess(&two_twos, &guess(HandType::Pair, Rank::Two)).exists);
        assert!(!verify_guess(&two_twos, &guess(HandType::ThreeOfAKind, Rank::Two)).exists);
    }

    #[test]
    fn test_wilds_are_not_overallocated() {
        // One wild cannot stretch to both trips and a pair.
        let pool = [
            c(Rank::King, Suit::Spade),
            c(Rank::King, Suit::Heart),
            c(Rank::Five, Suit::Club),
            c(Rank::Two, Suit::Diamond),
        ];
        assert!(verify_guess(&pool, &guess(HandType::ThreeOfAKind, Rank::King)).exists);
        assert!(!verify_guess(&pool, &guess(HandType::FullHouse, Rank::King)).exists);
    }

    #[test]
    fn test_two_pair_needs_distinct_second_pair() {
        let pool = [
            c(Rank::King, Suit::Spade),
            c(Rank::King, Suit::Heart),
            c(Rank::King, Suit::Club),
            c(Rank::Four, Suit::Club),
        ];
        assert!(!verify_guess(&pool, &guess(HandType::TwoPair, Rank::King)).exists);

        let with_wild = [
            c(Rank::King, Suit::Spade),
            c(Rank::King, Suit::Heart),
            c(Rank::Four, Suit::Club),
            c(Rank::Two, Suit::Club),
        ];
        let result = verify_guess(&with_wild, &guess(HandType::TwoPair, Rank::King));
        assert!(result.exists);
        assert_eq!(result.hand.len(), 4);
    }

    #[test]
    fn test_two_pair_prefers_natural_second_pair() {
        let pool = [
            c(Rank::King, Suit::Spade),
            c(Rank::King, Suit::Heart),
            c(Rank::Ace, Suit::Club),
            c(Rank::Six, Suit::Club),
            c(Rank::Six, Suit::Diamond),
            c(Rank::Two, Suit::Club),
        ];
        let result = verify_guess(&pool, &guess(HandType::TwoPair, Rank::King));
        assert!(result.exists);
        assert!(result.hand[2..].iter().all(|card| card.rank == Rank::Six));
    }

    #[test]
    fn test_full_house_with_any_rank() {
        let pool = [
            c(Rank::Eight, Suit::Spade),
            c(Rank::Eight, Suit::Heart),
            c(Rank::Eight, Suit::Club),
            c(Rank::Jack, Suit::Club),
            c(Rank::Jack, Suit::Diamond),
        ];
        assert!(verify_guess(&pool, &HandGuess::new(HandType::FullHouse, None)).exists);
        assert!(verify_guess(&pool, &guess(HandType::FullHouse, Rank::Eight)).exists);
        assert!(!verify_guess(&pool, &guess(HandType::FullHouse, Rank::Jack)).exists);
    }

    #[test]
    fn test_straight_with_wild_gap() {
        let pool = [
            c(Rank::Five, Suit::Spade),
            c(Rank::Six, Suit::Heart),
            c(Rank::Eight, Suit::Club),
            c(Rank::Nine, Suit::Club),
            c(Rank::Two, Suit::Diamond),
        ];
        let result = verify_guess(&pool, &guess(HandType::Straight, Rank::Nine));
        assert!(result.exists);
        assert_eq!(result.hand.len(), 5);
        assert!(!verify_guess(&pool, &guess(HandType::Straight, Rank::Ten)).exists);
    }

    #[test]
    fn test_wheel_and_no_wraparound() {
        let wheel = [
            c(Rank::Ace, Suit::Spade),
            c(Rank::Two, Suit::Heart),
            c(Rank::Three, Suit::Club),
            c(Rank::Four, Suit::Club),
            c(Rank::Five, Suit::Diamond),
        ];
        assert!(verify_guess(&wheel, &guess(HandType::Straight, Rank::Five)).exists);

        let wrap = [
            c(Rank::Queen, Suit::Spade),
            c(Rank::King, Suit::Heart),
            c(Rank::Ace, Suit::Club),
            c(Rank::Three, Suit::Club),
            c(Rank::Four, Suit::Diamond),
        ];
        assert!(!verify_guess(&wrap, &HandGuess::new(HandType::Straight, None)).exists);
    }

    #[test]
    fn test_flush_with_wild() {
        let pool = [
            c(Rank::Ace, Suit::Heart),
            c(Rank::Nine, Suit::Heart),
            c(Rank::Seven, Suit::Heart),
            c(Rank::Four, Suit::Heart),
            c(Rank::Two, Suit::Spade),
            c(Rank::King, Suit::Club),
        ];
        assert!(verify_guess(&pool, &HandGuess::new(HandType::Flush, None)).exists);
        assert!(verify_guess(&pool, &guess(HandType::Flush, Rank::Ace)).exists);
        // The wild stands in for the missing king of hearts.
        assert!(verify_guess(&pool, &guess(HandType::Flush, Rank::King)).exists);

        let natural = [
            c(Rank::Ace, Suit::Heart),
            c(Rank::Nine, Suit::Heart),
            c(Rank::Seven, Suit::Heart),
            c(Rank::Four, Suit::Heart),
            c(Rank::Three, Suit::Heart),
            c(Rank::King, Suit::Club),
        ];
        assert!(verify_guess(&natural, &guess(HandType::Flush, Rank::Nine)).exists);
        assert!(!verify_guess(&natural, &guess(HandType::Flush, Rank::King)).exists);
    }

    #[test]
    fn test_straight_flush_needs_one_suit() {
        let mixed = [
            c(Rank::Five, Suit::Heart),
            c(Rank::Six, Suit::Heart),
            c(Rank::Seven, Suit::Heart),
            c(Rank::Eight, Suit::Heart),
            c(Rank::Nine, Suit::Spade),
        ];
        assert!(verify_guess(&mixed, &guess(HandType::Straight, Rank::Nine)).exists);
        assert!(!verify_guess(&mixed, &guess(HandType::StraightFlush, Rank::Nine)).exists);

        let mut suited = mixed;
        suited[4] = c(Rank::Two, Suit::Club);
        assert!(verify_guess(&suited, &guess(HandType::StraightFlush, Rank::Nine)).exists);
    }

    #[test]
    fn test_four_of_a_kind_from_wilds() {
        let pool = [
            c(Rank::Jack, Suit::Spade),
            c(Rank::Two, Suit::Heart),
            c(Rank::Two, Suit::Club),
            c(Rank::Two, Suit::Diamond),
        ];
        let result = verify_guess(&pool, &guess(HandType::FourOfAKind, Rank::Jack));
        assert!(result.exists);
        assert_eq!(result.hand[0], c(Rank::Jack, Suit::Spade));
    }

    #[test]
    fn test_any_high_card_on_empty_pool() {
        assert!(!verify_guess(&[], &HandGuess::new(HandType::HighCard, None)).exists);
    }
}
