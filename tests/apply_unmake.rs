//! Applying a move and taking it back must restore the position exactly.

mod common;

use common::{position_from_fen, KIWIPETE, POSITION_4, TABLES};
use magic_movegen::{generate_legal_moves, GameStatus, Position};
use pretty_assertions::assert_eq;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

/// Play a random legal line of up to `max_depth` plies, then unmake it move by move, checking
/// each intermediate position is restored.
fn random_round_trip(start: &Position, rng: &mut StdRng, max_depth: usize) {
    let mut position = start.clone();
    let mut history = vec![position.clone()];
    let depth = rng.gen_range(1..=max_depth);

    for _ in 0..depth {
        let moves = generate_legal_moves(&position, &TABLES);
        let Some(&mv) = moves.choose(rng) else {
            break;
        };
        position.apply_move(mv);
        history.push(position.clone());
    }

    history.pop();
    while let Some(expected) = history.pop() {
        assert!(position.unmake_move().is_some());
        assert_eq!(position, expected);
    }
    assert_eq!(position.unmake_move(), None);
}

#[test]
fn round_trip_from_start() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let start = Position::new();
    for _ in 0..1000 {
        random_round_trip(&start, &mut rng, 5);
    }
}

#[test]
fn round_trip_from_tactical_positions() {
    // castling, en passant, promotions and pins all show up within a few plies here
    let mut rng = StdRng::seed_from_u64(7);
    for fen in [KIWIPETE, POSITION_4] {
        let start = position_from_fen(fen);
        for _ in 0..500 {
            random_round_trip(&start, &mut rng, 5);
        }
    }
}

#[test]
fn random_games_end_in_mate_or_stalemate_consistently() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..20 {
        let mut position = Position::new();
        for _ in 0..200 {
            let moves = generate_legal_moves(&position, &TABLES);
            match moves.choose(&mut rng) {
                Some(&mv) => position.apply_move(mv),
                None => {
                    let status = magic_movegen::game_status(&position, &TABLES);
                    let expected = if magic_movegen::is_in_check(&position, &TABLES) {
                        GameStatus::Checkmate
                    } else {
                        GameStatus::Stalemate
                    };
                    assert_eq!(status, expected);
                    break;
                }
            }
        }
        // every move played can be taken back
        while position.unmake_move().is_some() {}
        assert_eq!(position, Position::new());
    }
}
