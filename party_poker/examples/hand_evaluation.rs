//! Hand Evaluation Example
//!
//! Scores a Hold'em showdown, then checks a few BS Poker claims against a
//! pool that holds wild twos.

use party_poker::bluff::{HandGuess, HandType, verify_guess};
use party_poker::entities::{Card, Rank, Suit};
use party_poker::functional::{argmax, evaluate_holdem};

fn main() {
    println!("=== Hold'em showdown ===\n");

    let board = [
        Card::new(Rank::King, Suit::Heart),
        Card::new(Rank::Queen, Suit::Heart),
        Card::new(Rank::Seven, Suit::Club),
        Card::new(Rank::Seven, Suit::Diamond),
        Card::new(Rank::Two, Suit::Spade),
    ];
    let players = [
        ("alice", [Card::new(Rank::Ace, Suit::Heart), Card::new(Rank::Jack, Suit::Heart)]),
        ("bob", [Card::new(Rank::King, Suit::Spade), Card::new(Rank::King, Suit::Club)]),
        ("carol", [Card::new(Rank::Seven, Suit::Spade), Card::new(Rank::Three, Suit::Diamond)]),
    ];

    let hands: Vec<_> = players
        .iter()
        .map(|(_, hole)| evaluate_holdem(hole, &board))
        .collect();
    for ((name, hole), hand) in players.iter().zip(&hands) {
        println!("{name:>6}: {} {} -> {}", hole[0], hole[1], hand.name);
    }
    for winner in argmax(&hands) {
        println!("Winner: {}", players[winner].0);
    }

    println!("\n=== BS Poker claims ===\n");

    let pool = [
        Card::new(Rank::Two, Suit::Spade),
        Card::new(Rank::Two, Suit::Heart),
        Card::new(Rank::Seven, Suit::Diamond),
        Card::new(Rank::Nine, Suit::Club),
    ];
    println!(
        "Pool: {}",
        pool.iter().map(Card::to_string).collect::<Vec<_>>().join(" ")
    );

    let claims = [
        HandGuess::new(HandType::Pair, Some(Rank::King)),
        HandGuess::new(HandType::ThreeOfAKind, Some(Rank::Nine)),
        HandGuess::new(HandType::Pair, Some(Rank::Two)),
        HandGuess::new(HandType::FourOfAKind, None),
    ];
    for claim in &claims {
        let verification = verify_guess(&pool, claim);
        if verification.exists {
            let cards: Vec<String> = verification.hand.iter().map(Card::to_string).collect();
            println!("{claim}: yes ({})", cards.join(" "));
        } else {
            println!("{claim}: bullshit");
        }
    }
}
