//! Statistical checks on shuffling and dealing.

use party_poker::entities::{Card, Deck, create_deck};
use rand::{SeedableRng, rngs::StdRng};
use std::collections::{HashMap, HashSet};

/// Chi-square critical value for 51 degrees of freedom at p = 0.001.
const CHI_SQUARE_CRITICAL_51: f64 = 87.97;

#[test]
fn test_top_card_is_uniform() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let trials = 52_000;
    let mut counts: HashMap<Card, u32> = HashMap::new();

    for _ in 0..trials {
        let mut deck = Deck::new();
        deck.shuffle_with(&mut rng);
        let top = deck.deal_card().expect("full deck");
        *counts.entry(top).or_default() += 1;
    }

    assert_eq!(counts.len(), 52, "every card should reach the top");

    let expected = f64::from(trials) / 52.0;
    let chi_square: f64 = counts
        .values()
        .map(|&observed| {
            let diff = f64::from(observed) - expected;
            diff * diff / expected
        })
        .sum();
    assert!(
        chi_square < CHI_SQUARE_CRITICAL_51,
        "top card distribution looks biased: chi-square {chi_square:.2}"
    );
}

#[test]
fn test_full_table_deal_has_no_duplicates() {
    for _ in 0..100 {
        let mut deck = Deck::shuffled();
        let mut seen = HashSet::new();

        // Ten Hold'em players plus a full board.
        for _ in 0..10 {
            for card in deck.deal(2) {
                assert!(seen.insert(card));
            }
        }
        for card in deck.deal(5) {
            assert!(seen.insert(card));
        }

        assert_eq!(seen.len(), 25);
        assert_eq!(deck.len(), 27);
    }
}

#[test]
fn test_shuffles_differ() {
    let a = Deck::shuffled().remaining();
    let b = Deck::shuffled().remaining();
    // 1 in 52! chance of a false failure.
    assert_ne!(a, b);
    assert_ne!(a, create_deck());
}
