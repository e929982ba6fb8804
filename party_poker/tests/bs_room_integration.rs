//! Integration tests driving BS Poker rooms through the room manager.

use party_poker::{
    bluff::{HandGuess, HandType},
    entities::Rank,
    room::{
        BsAction, BsAdvance, BsOutcome, BsPhase, BsRoomManager, RoomError, RoomOptions,
        RoomStatus,
        bs::ELIMINATION_CARD_COUNT,
    },
};

async fn room_with(manager: &BsRoomManager, players: &[&str]) -> String {
    let room = manager
        .create_room(
            players[0],
            RoomOptions {
                room_name: "Bluffers".to_string(),
                password: Some("liar".to_string()),
                max_players: 5,
                is_public: false,
                settings: (),
            },
        )
        .await
        .expect("room created");

    for player in players {
        manager
            .join_room(player, &room.id, Some("liar"), player)
            .await
            .expect("joined");
    }
    room.id
}

async fn current_player(manager: &BsRoomManager, room_id: &str) -> String {
    let view = manager
        .get_game_state_for_player(room_id, "spectator")
        .await
        .unwrap();
    let game = view.game.expect("game running");
    view.players[game.current_player_index].id.clone()
}

/// Opens with an ace-high straight flush claim, then challenges it.
async fn play_losing_round(manager: &BsRoomManager, room_id: &str) -> String {
    let guesser = current_player(manager, room_id).await;
    let impossible = HandGuess::new(HandType::StraightFlush, Some(Rank::Ace));
    let guess = manager
        .handle_action(room_id, &guesser, BsAction::Guess { guess: impossible })
        .await
        .unwrap();
    assert!(matches!(guess, Ok(BsOutcome::GuessAccepted { .. })));

    let caller = current_player(manager, room_id).await;
    let outcome = manager
        .handle_action(room_id, &caller, BsAction::Bullshit)
        .await
        .unwrap()
        .unwrap();
    let BsOutcome::Challenge(result) = outcome else {
        panic!("expected a challenge result");
    };
    result.loser_id
}

#[tokio::test]
async fn test_private_room_is_unlisted() {
    let manager = BsRoomManager::new();
    let room_id = room_with(&manager, &["a", "b"]).await;
    assert!(room_id.starts_with("BLU-"));
    assert!(manager.get_public_rooms().await.is_empty());

    assert_eq!(
        manager
            .join_room("c", &room_id, Some("truth"), "c")
            .await
            .unwrap_err(),
        RoomError::InvalidPassword
    );
}

#[tokio::test]
async fn test_round_cycle() {
    let manager = BsRoomManager::new();
    let room_id = room_with(&manager, &["a", "b", "c"]).await;
    manager.start_game(&room_id).await.unwrap();

    assert_eq!(
        manager.continue_to_next_round(&room_id).await.unwrap_err(),
        RoomError::RoundNotOver
    );

    let own = manager
        .get_game_state_for_player(&room_id, "a")
        .await
        .unwrap();
    assert_eq!(own.players[0].cards.as_ref().map(Vec::len), Some(2));
    assert!(own.players[1].cards.is_none());

    // Wild twos can occasionally make the guess real, so either side may lose.
    let loser = play_losing_round(&manager, &room_id).await;
    let view = manager
        .get_game_state_for_player(&room_id, "a")
        .await
        .unwrap();
    let table = view.game.unwrap();
    assert_eq!(table.phase, BsPhase::RoundEnd);
    assert!(table.all_cards.is_some());
    let loser_seat = view.players.iter().position(|p| p.id == loser).unwrap();
    assert_eq!(view.players[loser_seat].card_count, 3);
    assert_eq!(table.dealer_index, loser_seat);

    let next = manager.continue_to_next_round(&room_id).await.unwrap();
    assert_eq!(next, BsAdvance::NextRound { round_number: 2 });

    let table = manager
        .get_game_state_for_player(&room_id, "a")
        .await
        .unwrap()
        .game
        .unwrap();
    assert_eq!(table.total_cards, 7);
    assert_eq!(table.phase, BsPhase::Bidding);
    assert_eq!(table.current_player_index, (loser_seat + 1) % 3);
}

#[tokio::test]
async fn test_game_runs_to_a_winner() {
    let manager = BsRoomManager::new();
    let room_id = room_with(&manager, &["a", "b"]).await;
    manager.start_game(&room_id).await.unwrap();

    // Each round adds one card to somebody, so someone is out within this
    // many rounds.
    let max_rounds = (ELIMINATION_CARD_COUNT - 2) * 2;
    let mut finished = None;
    for _ in 0..max_rounds {
        play_losing_round(&manager, &room_id).await;
        match manager.advance(&room_id).await.unwrap() {
            BsAdvance::NextRound { .. } => {}
            BsAdvance::Finished { winner_id } => {
                finished = Some(winner_id);
                break;
            }
        }
    }

    let winner = finished.expect("game should end").expect("someone wins");
    let view = manager
        .get_game_state_for_player(&room_id, &winner)
        .await
        .unwrap();
    assert_eq!(view.room.status, RoomStatus::Finished);
    assert_eq!(view.winner_id.as_deref(), Some(winner.as_str()));
    assert_eq!(
        view.players.iter().filter(|p| p.has_lost).count(),
        1,
        "exactly one player eliminated"
    );

    // A finished room can be restarted.
    manager.start_game(&room_id).await.unwrap();
    let view = manager
        .get_game_state_for_player(&room_id, &winner)
        .await
        .unwrap();
    assert_eq!(view.room.status, RoomStatus::Playing);
    assert!(view.players.iter().all(|p| p.card_count == 2 && !p.has_lost));
}

#[tokio::test]
async fn test_cannot_join_running_game() {
    let manager = BsRoomManager::new();
    let room_id = room_with(&manager, &["a", "b"]).await;
    manager.start_game(&room_id).await.unwrap();

    assert_eq!(
        manager
            .join_room("late", &room_id, Some("liar"), "late")
            .await
            .unwrap_err(),
        RoomError::GameInProgress
    );
}
