use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use party_poker::{
    bluff::{HandGuess, HandType, verify_guess},
    entities::{Card, Deck, Rank, Suit},
    functional::{argmax, evaluate_hand, evaluate_holdem},
};
use rand::{SeedableRng, rngs::StdRng};

fn seeded_deck(seed: u64) -> Deck {
    let mut deck = Deck::new();
    deck.shuffle_with(&mut StdRng::seed_from_u64(seed));
    deck
}

/// Benchmark hand evaluation with 5 cards (no combinations to search)
fn bench_evaluate_5_cards(c: &mut Criterion) {
    let cards = vec![
        Card::new(Rank::Ace, Suit::Spade),
        Card::new(Rank::Ace, Suit::Heart),
        Card::new(Rank::King, Suit::Spade),
        Card::new(Rank::King, Suit::Club),
        Card::new(Rank::Seven, Suit::Diamond),
    ];

    c.bench_function("evaluate_5_cards", |b| {
        b.iter(|| evaluate_hand(&cards));
    });
}

/// Benchmark hand evaluation with 7 cards (21 five-card combinations)
fn bench_evaluate_7_cards(c: &mut Criterion) {
    let mut deck = seeded_deck(7);
    let hole = deck.deal(2);
    let board = deck.deal(5);

    c.bench_function("evaluate_holdem_7_cards", |b| {
        b.iter(|| evaluate_holdem(&hole, &board));
    });
}

/// Benchmark showdown winner selection across table sizes
fn bench_showdown(c: &mut Criterion) {
    let mut group = c.benchmark_group("showdown");

    for n_players in [2usize, 6, 10] {
        let mut deck = seeded_deck(n_players as u64);
        let board = deck.deal(5);
        let holes: Vec<Vec<Card>> = (0..n_players).map(|_| deck.deal(2)).collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(n_players),
            &n_players,
            |b, _| {
                b.iter(|| {
                    let hands: Vec<_> = holes
                        .iter()
                        .map(|hole| evaluate_holdem(hole, &board))
                        .collect();
                    argmax(&hands)
                });
            },
        );
    }

    group.finish();
}

/// Benchmark BS Poker guess verification on growing pools
fn bench_verify_guess(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify_guess");
    let guesses = [
        HandGuess::new(HandType::FullHouse, None),
        HandGuess::new(HandType::Straight, Some(Rank::Nine)),
        HandGuess::new(HandType::StraightFlush, None),
    ];

    for pool_size in [4usize, 12, 30] {
        let pool = seeded_deck(pool_size as u64).deal(pool_size);
        for guess in &guesses {
            group.bench_with_input(
                BenchmarkId::new(guess.description.clone(), pool_size),
                &pool,
                |b, pool| {
                    b.iter(|| verify_guess(pool, guess));
                },
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_evaluate_5_cards,
    bench_evaluate_7_cards,
    bench_showdown,
    bench_verify_guess,
);
criterion_main!(benches);
