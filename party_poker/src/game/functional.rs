//! Texas Hold'em hand evaluation.
//!
//! Hands are scored into a [`HandRanking`]: a category plus a tiebreaker
//! vector (group values first, then kickers). Seven-card hands are scored by
//! brute force over every five-card combination.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::BTreeMap, fmt};

use super::entities::{Card, Value};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandCategory {
    HighCard = 1,
    Pair = 2,
    TwoPair = 3,
    ThreeOfAKind = 4,
    Straight = 5,
    Flush = 6,
    FullHouse = 7,
    FourOfAKind = 8,
    StraightFlush = 9,
    RoyalFlush = 10,
}

impl HandCategory {
    /// Category strength, 1 (high card) through 10 (royal flush).
    #[must_use]
    pub fn strength(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::HighCard => "High Card",
            Self::Pair => "Pair",
            Self::TwoPair => "Two Pair",
            Self::ThreeOfAKind => "Three of a Kind",
            Self::Straight => "Straight",
            Self::Flush => "Flush",
            Self::FullHouse => "Full House",
            Self::FourOfAKind => "Four of a Kind",
            Self::StraightFlush => "Straight Flush",
            Self::RoyalFlush => "Royal Flush",
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HandRanking {
    pub rank: HandCategory,
    pub name: String,
    pub cards: Vec<Card>,
    pub tiebreaker: Vec<Value>,
}

impl HandRanking {
    fn new(rank: HandCategory, cards: Vec<Card>, tiebreaker: Vec<Value>) -> Self {
        Self {
            rank,
            name: rank.name().to_string(),
            cards,
            tiebreaker,
        }
    }
}

/// Score the best five-card hand that can be made from `cards`.
///
/// Up to five cards are scored as given; anything larger is scored as the
/// maximum over all five-card subsets.
#[must_use]
pub fn evaluate_hand(cards: &[Card]) -> HandRanking {
    if cards.len() <= 5 {
        return evaluate_five(cards);
    }

    cards
        .iter()
        .copied()
        .combinations(5)
        .map(|combo| evaluate_five(&combo))
        .max_by(compare_hands)
        .unwrap_or_else(|| evaluate_five(&[]))
}

/// Evaluate hole cards together with the board.
#[must_use]
pub fn evaluate_holdem(hole_cards: &[Card], community_cards: &[Card]) -> HandRanking {
    let mut cards = Vec::with_capacity(hole_cards.len() + community_cards.len());
    cards.extend_from_slice(hole_cards);
    cards.extend_from_slice(community_cards);
    evaluate_hand(&cards)
}

/// Compare two scored hands by category, then tiebreaker vector. Missing
/// tiebreaker entries count as zero.
#[must_use]
pub fn compare_hands(a: &HandRanking, b: &HandRanking) -> Ordering {
    a.rank.cmp(&b.rank).then_with(|| {
        let len = a.tiebreaker.len().max(b.tiebreaker.len());
        (0..len)
            .map(|i| {
                let x = a.tiebreaker.get(i).copied().unwrap_or(0);
                let y = b.tiebreaker.get(i).copied().unwrap_or(0);
                x.cmp(&y)
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

/// Indices of every hand tied for best, in ascending order.
#[must_use]
pub fn argmax(hands: &[HandRanking]) -> Vec<usize> {
    let Some(best) = hands.iter().max_by(|a, b| compare_hands(a, b)) else {
        return vec![];
    };
    hands
        .iter()
        .enumerate()
        .filter(|(_, hand)| compare_hands(hand, best).is_eq())
        .map(|(idx, _)| idx)
        .collect()
}

/// Top value of a straight in `values` (sorted descending, five distinct),
/// with the wheel reported as five-high.
fn straight_high(values: &[Value]) -> Option<Value> {
    if values.len() != 5 || values.windows(2).any(|w| w[0] == w[1]) {
        return None;
    }
    if values[0] - values[4] == 4 {
        return Some(values[0]);
    }
    if values == [14, 5, 4, 3, 2] {
        return Some(5);
    }
    None
}

fn evaluate_five(cards: &[Card]) -> HandRanking {
    let mut sorted = cards.to_vec();
    sorted.sort_by(|a, b| b.value().cmp(&a.value()).then(a.suit.cmp(&b.suit)));
    let values: Vec<Value> = sorted.iter().map(Card::value).collect();

    let is_flush = sorted.len() == 5 && sorted.iter().map(|c| c.suit).all_equal();
    let straight = straight_high(&values);

    // (count, value) groups, biggest group first then highest value.
    let mut counts: BTreeMap<Value, usize> = BTreeMap::new();
    for &v in &values {
        *counts.entry(v).or_default() += 1;
    }
    let mut groups: Vec<(usize, Value)> = counts.into_iter().map(|(v, c)| (c, v)).collect();
    groups.sort_by(|a, b| b.cmp(a));
    let group_values: Vec<Value> = groups.iter().map(|&(_, v)| v).collect();
    let shape: Vec<usize> = groups.iter().map(|&(c, _)| c).collect();

    // Order cards by group so the reported hand reads naturally ("KK 77 A").
    let mut grouped = sorted.clone();
    grouped.sort_by_key(|card| {
        let pos = group_values
            .iter()
            .position(|&v| v == card.value())
            .unwrap_or(usize::MAX);
        (pos, card.suit)
    });

    // Flushes and straights have five distinct values, so they never
    // collide with the grouped categories.
    match (is_flush, straight) {
        (true, Some(14)) => HandRanking::new(HandCategory::RoyalFlush, sorted, vec![14]),
        (true, Some(high)) => {
            HandRanking::new(HandCategory::StraightFlush, wheel_order(sorted, high), vec![high])
        }
        (true, None) => HandRanking::new(HandCategory::Flush, sorted, values),
        (false, Some(high)) => {
            HandRanking::new(HandCategory::Straight, wheel_order(sorted, high), vec![high])
        }
        (false, None) => match shape.as_slice() {
            [4, ..] => HandRanking::new(HandCategory::FourOfAKind, grouped, group_values),
            [3, 2] => HandRanking::new(HandCategory::FullHouse, grouped, group_values),
            [3, ..] => HandRanking::new(HandCategory::ThreeOfAKind, grouped, group_values),
            [2, 2, ..] => HandRanking::new(HandCategory::TwoPair, grouped, group_values),
            [2, ..] => HandRanking::new(HandCategory::Pair, grouped, group_values),
            _ => HandRanking::new(HandCategory::HighCard, sorted, values),
        },
    }
}

/// Put the ace last when the straight is the wheel.
fn wheel_order(mut cards: Vec<Card>, high: Value) -> Vec<Card> {
    if high == 5 {
        cards.rotate_left(1);
    }
    cards
}
