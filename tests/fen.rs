//! FEN round-trip and parse-error integration tests.

use chess_core::error::FenParseError;
use chess_core::{fen, position::Position};

#[test]
fn startpos_round_trips() {
    let pos = Position::startpos();
    let written = fen::to_fen(&pos);
    assert_eq!(written, "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    let parsed = fen::parse(&written).unwrap();
    assert_eq!(fen::to_fen(&parsed), written);
}

#[test]
fn arbitrary_midgame_fen_round_trips() {
    let original = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";
    let parsed = fen::parse(original).unwrap();
    assert_eq!(fen::to_fen(&parsed), original);
}

#[test]
fn en_passant_target_round_trips() {
    let original = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3";
    let parsed = fen::parse(original).unwrap();
    assert_eq!(parsed.en_passant_target().unwrap().to_string(), "d6");
    assert_eq!(fen::to_fen(&parsed), original);
}

#[test]
fn wrong_field_count_is_rejected() {
    let err = fen::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -").unwrap_err();
    assert!(matches!(err, FenParseError::WrongFieldCount { .. }));
}

#[test]
fn malformed_side_to_move_is_rejected() {
    let err = fen::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1").unwrap_err();
    assert!(matches!(err, FenParseError::InvalidSideToMove { .. }));
}

#[test]
fn position_with_no_king_is_rejected_as_illegal_position() {
    let err = fen::parse("8/8/8/8/8/8/8/7k w - - 0 1").unwrap_err();
    assert!(matches!(err, FenParseError::IllegalPosition(_)));
}

#[test]
fn position_with_two_kings_of_one_color_is_rejected() {
    let err = fen::parse("k6K/8/8/8/8/8/8/7K w - - 0 1").unwrap_err();
    assert!(matches!(err, FenParseError::IllegalPosition(_)));
}
