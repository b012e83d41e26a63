//! End-to-end search scenarios driven entirely through the `Engine` facade.

use chess_core::config::evaluation::MATE_SCORE;
use chess_core::engine::Engine;
use chess_core::error::EngineError;
use chess_core::search::{AiLevel, SearchOptions};
use chess_core::{fen, position::Position};

#[test]
fn fools_mate_is_terminal_with_no_legal_moves() {
    let pos = fen::parse("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
    let mut engine = Engine::new();
    let result = engine.select_move(&pos, AiLevel::Two, SearchOptions::default());
    assert!(matches!(result, Err(EngineError::NoLegalMoves(_))));
}

#[test]
fn fools_mate_delivering_move_is_found_from_the_side_to_move_before_it() {
    // After 1. f3 e5 2. g4, black to move: Qh4# is mate in one.
    let pos = fen::parse("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq g3 0 2").unwrap();
    let mut engine = Engine::new();
    let result = engine.select_move(&pos, AiLevel::Two, SearchOptions::default()).unwrap();
    assert_eq!(result.best_move.from.to_string(), "d8");
    assert_eq!(result.best_move.to.to_string(), "h4");
    assert!(result.score > MATE_SCORE / 2);
}

#[test]
fn back_rank_mate_in_one_is_found() {
    let pos = fen::parse("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    let mut engine = Engine::new();
    let result = engine.select_move(&pos, AiLevel::Three, SearchOptions::default()).unwrap();
    assert_eq!(result.best_move.to.to_string(), "a8");
}

#[test]
fn opening_move_choice_is_stable_across_runs_at_depth_four() {
    let pos = Position::startpos();
    let mut first = Engine::new();
    let a = first.select_move(&pos, AiLevel::Four, SearchOptions::default()).unwrap();

    let mut second = Engine::new();
    let b = second.select_move(&pos, AiLevel::Four, SearchOptions::default()).unwrap();

    assert_eq!(a.best_move, b.best_move);
}

#[test]
fn apply_then_select_move_keeps_advancing_toward_mate() {
    let pos = fen::parse("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    let mut engine = Engine::new();
    let result = engine.select_move(&pos, AiLevel::Three, SearchOptions::default()).unwrap();
    let next = engine.apply(&pos, result.best_move).unwrap();
    assert!(matches!(
        engine.select_move(&next, AiLevel::Two, SearchOptions::default()),
        Err(EngineError::NoLegalMoves(_))
    ));
}
