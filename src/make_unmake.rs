//! Move application and its inverse.
//!
//! `Position::make` mutates the position and returns an [`UnmakeInfo`]
//! capturing everything `unmake` needs to restore it exactly, including
//! the pre-move Zobrist hash. Search pushes an `UnmakeInfo` per ply and pops
//! it on backtrack rather than cloning the whole position.

use crate::castling::CastlingRights;
use crate::moves::Move;
use crate::piece::{Color, Piece, PieceKind};
use crate::position::Position;
use crate::square::Square;
use crate::zobrist;

/// Everything needed to undo one `Position::make` call.
#[derive(Clone, Debug)]
pub struct UnmakeInfo {
    mv: Move,
    captured: Option<(Piece, Square)>,
    previous_castling_rights: CastlingRights,
    previous_en_passant_target: Option<Square>,
    previous_halfmove_clock: u32,
    previous_hash: u64,
}

impl Position {
    pub fn make(&mut self, mv: Move) -> UnmakeInfo {
        let previous_castling_rights = self.castling_rights;
        let previous_en_passant_target = self.en_passant_target;
        let previous_halfmove_clock = self.halfmove_clock;
        let previous_hash = self.hash;

        let color = self.turn;
        let mut hash = self.hash;
        hash ^= zobrist::side_to_move_key(color);
        hash ^= zobrist::en_passant_key(self.en_passant_target);
        hash ^= zobrist::castling_key(self.castling_rights);

        let captured = if mv.is_en_passant() {
            let capture_rank = if color == Color::White {
                mv.to.rank() - 1
            } else {
                mv.to.rank() + 1
            };
            let capture_sq = Square::new(capture_rank, mv.to.file());
            let piece = self.remove_piece(capture_sq).expect("en passant target must hold a pawn");
            Some((piece, capture_sq))
        } else if mv.is_capture() {
            let piece = self.remove_piece(mv.to).expect("capture move must have a target piece");
            Some((piece, mv.to))
        } else {
            None
        };

        let moving_piece = self.remove_piece(mv.from).expect("move source must hold the moving piece");

        if mv.is_castling() {
            self.set_piece(mv.to, moving_piece);
            let (rook_from_file, rook_to_file) = if mv.to.file() == 6 { (7, 5) } else { (0, 3) };
            let rook_rank = mv.to.rank();
            let rook_from = Square::new(rook_rank, rook_from_file);
            let rook_to = Square::new(rook_rank, rook_to_file);
            let rook = self.remove_piece(rook_from).expect("castling rook missing");
            self.set_piece(rook_to, rook);
        } else {
            let placed = Piece::new(color, mv.promotion.unwrap_or(moving_piece.kind));
            self.set_piece(mv.to, placed);
        }

        self.en_passant_target = if mv.is_double_pawn_push() {
            let ep_rank = (mv.from.rank() + mv.to.rank()) / 2;
            Some(Square::new(ep_rank, mv.from.file()))
        } else {
            None
        };

        if moving_piece.kind == PieceKind::King {
            self.castling_rights.remove(CastlingRights::both(color));
        }
        if mv.from == home_rook_square(color, 0) {
            self.castling_rights.remove(CastlingRights::queenside(color));
        } else if mv.from == home_rook_square(color, 7) {
            self.castling_rights.remove(CastlingRights::kingside(color));
        }
        if let Some((captured_piece, capture_sq)) = captured {
            if captured_piece.kind == PieceKind::Rook {
                let opponent = color.opponent();
                if capture_sq == home_rook_square(opponent, 0) {
                    self.castling_rights.remove(CastlingRights::queenside(opponent));
                } else if capture_sq == home_rook_square(opponent, 7) {
                    self.castling_rights.remove(CastlingRights::kingside(opponent));
                }
            }
        }

        if moving_piece.kind == PieceKind::Pawn || mv.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if color == Color::Black {
            self.fullmove_number += 1;
        }

        self.turn = color.opponent();

        hash = incremental_hash_after_move(
            hash,
            mv,
            moving_piece,
            color,
            captured,
            self.en_passant_target,
            self.castling_rights,
        );
        self.hash = hash;
        debug_assert_eq!(
            self.hash,
            self.compute_hash_from_scratch(),
            "incremental hash diverged from from-scratch recompute"
        );
        self.push_repetition();

        UnmakeInfo {
            mv,
            captured,
            previous_castling_rights,
            previous_en_passant_target,
            previous_halfmove_clock,
            previous_hash,
        }
    }

    pub fn unmake(&mut self, info: UnmakeInfo) {
        self.pop_repetition();
        self.turn = self.turn.opponent();
        let color = self.turn;
        if color == Color::Black {
            self.fullmove_number -= 1;
        }

        self.remove_piece(info.mv.to).expect("move destination must hold the moved piece");

        if info.mv.is_castling() {
            let (rook_from_file, rook_to_file) = if info.mv.to.file() == 6 { (7, 5) } else { (0, 3) };
            let rook_rank = info.mv.to.rank();
            let rook_from = Square::new(rook_rank, rook_from_file);
            let rook_to = Square::new(rook_rank, rook_to_file);
            let rook = self.remove_piece(rook_to).expect("castling rook missing on unmake");
            self.set_piece(rook_from, rook);
            self.set_piece(info.mv.from, Piece::new(color, PieceKind::King));
        } else {
            self.set_piece(info.mv.from, info.mv.piece);
        }

        if let Some((captured_piece, capture_sq)) = info.captured {
            self.set_piece(capture_sq, captured_piece);
        }

        self.castling_rights = info.previous_castling_rights;
        self.en_passant_target = info.previous_en_passant_target;
        self.halfmove_clock = info.previous_halfmove_clock;
        self.hash = info.previous_hash;
    }
}

fn home_rook_square(color: Color, file: usize) -> Square {
    let rank = if color == Color::White { 0 } else { 7 };
    Square::new(rank, file)
}

/// Cross-check helper for the `debug_assert_eq!` above: reconstructs the hash
/// purely from XOR deltas, independent of the from-scratch mailbox walk, so a
/// bug in one method won't be masked by the same bug in the other.
#[allow(clippy::too_many_arguments)]
fn incremental_hash_after_move(
    mut hash: u64,
    mv: Move,
    moving_piece: Piece,
    color: Color,
    captured: Option<(Piece, Square)>,
    new_en_passant: Option<Square>,
    new_castling: CastlingRights,
) -> u64 {
    if let Some((piece, sq)) = captured {
        hash ^= zobrist::piece_square_key(piece, sq);
    }
    hash ^= zobrist::piece_square_key(moving_piece, mv.from);
    if mv.is_castling() {
        hash ^= zobrist::piece_square_key(moving_piece, mv.to);
        let (rook_from_file, rook_to_file) = if mv.to.file() == 6 { (7, 5) } else { (0, 3) };
        let rank = mv.to.rank();
        let rook = Piece::new(color, PieceKind::Rook);
        hash ^= zobrist::piece_square_key(rook, Square::new(rank, rook_from_file));
        hash ^= zobrist::piece_square_key(rook, Square::new(rank, rook_to_file));
    } else {
        let placed = Piece::new(color, mv.promotion.unwrap_or(moving_piece.kind));
        hash ^= zobrist::piece_square_key(placed, mv.to);
    }
    hash ^= zobrist::en_passant_key(new_en_passant);
    hash ^= zobrist::castling_key(new_castling);
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen;
    use crate::moves::MoveFlags;

    #[test]
    fn make_then_unmake_restores_startpos() {
        let mut pos = Position::startpos();
        let before = fen::to_fen(&pos);
        let before_hash = pos.hash();

        let mv = Move {
            from: Square::new(1, 4),
            to: Square::new(3, 4),
            piece: Piece::new(Color::White, PieceKind::Pawn),
            captured: None,
            flags: MoveFlags::PAWN_DOUBLE_PUSH,
            promotion: None,
        };
        let undo = pos.make(mv);
        assert_ne!(pos.hash(), before_hash);
        assert_eq!(pos.en_passant_target(), Some(Square::new(2, 4)));

        pos.unmake(undo);
        assert_eq!(fen::to_fen(&pos), before);
        assert_eq!(pos.hash(), before_hash);
    }

    #[test]
    fn castling_moves_both_king_and_rook() {
        let mut pos = fen::parse("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let mv = Move {
            from: Square::new(0, 4),
            to: Square::new(0, 6),
            piece: Piece::new(Color::White, PieceKind::King),
            captured: None,
            flags: MoveFlags::CASTLING,
            promotion: None,
        };
        let undo = pos.make(mv);
        assert_eq!(pos.piece_at(Square::new(0, 6)).unwrap().kind, PieceKind::King);
        assert_eq!(pos.piece_at(Square::new(0, 5)).unwrap().kind, PieceKind::Rook);
        assert!(pos.piece_at(Square::new(0, 7)).is_none());

        pos.unmake(undo);
        assert_eq!(pos.piece_at(Square::new(0, 4)).unwrap().kind, PieceKind::King);
        assert_eq!(pos.piece_at(Square::new(0, 7)).unwrap().kind, PieceKind::Rook);
    }
}
