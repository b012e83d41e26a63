//! Rook file and rank bonuses: open/half-open files and the seventh rank.

use crate::bitboard::Bitboard;
use crate::config::evaluation as cfg;
use crate::piece::{Color, PieceKind};
use crate::position::Position;

fn file_mask(file: usize) -> Bitboard {
    Bitboard(Bitboard::FILE_A.0 << file)
}

/// White-minus-black rook bonus, `(mg, eg)`.
pub fn rook_bonuses(pos: &Position) -> (i32, i32) {
    let mut mg = 0i32;
    let mut eg = 0i32;

    let white_pawns = pos.pieces_of(Color::White, PieceKind::Pawn);
    let black_pawns = pos.pieces_of(Color::Black, PieceKind::Pawn);
    let seventh_rank = [6usize, 1usize];

    for color in [Color::White, Color::Black] {
        let sign = if color == Color::White { 1 } else { -1 };
        let own_pawns = if color == Color::White { white_pawns } else { black_pawns };
        let opp_pawns = if color == Color::White { black_pawns } else { white_pawns };
        let seventh = seventh_rank[color.index()];

        for sq in pos.pieces_of(color, PieceKind::Rook).iter() {
            let file = file_mask(sq.file());
            let own_on_file = (own_pawns & file).popcount();
            let opp_on_file = (opp_pawns & file).popcount();

            if own_on_file == 0 && opp_on_file == 0 {
                mg += sign * cfg::ROOK_OPEN_MG;
                eg += sign * cfg::ROOK_OPEN_EG;
            } else if own_on_file == 0 {
                mg += sign * cfg::ROOK_HALF_OPEN_MG;
                eg += sign * cfg::ROOK_HALF_OPEN_EG;
            }

            if sq.rank() == seventh {
                mg += sign * cfg::ROOK_7TH_MG;
                eg += sign * cfg::ROOK_7TH_EG;
            }
        }
    }

    (mg, eg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_rook_bonus_is_zero() {
        let pos = Position::startpos();
        assert_eq!(rook_bonuses(&pos), (0, 0));
    }

    #[test]
    fn rook_on_open_file_beats_rook_behind_pawns() {
        let open = crate::fen::parse("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let blocked = crate::fen::parse("4k3/8/8/8/8/8/P7/R3K3 w - - 0 1").unwrap();
        let (open_mg, _) = rook_bonuses(&open);
        let (blocked_mg, _) = rook_bonuses(&blocked);
        assert!(open_mg > blocked_mg);
    }
}
