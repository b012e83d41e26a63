//! Pawn piece-square values plus doubled/isolated/backward/passed-pawn
//! structure bonuses. Pawns get their own PST (separate from
//! `config::evaluation::PST_MG`/`PST_EG`) because their score also depends on
//! file occupancy, unlike the other piece kinds.

use crate::bitboard::Bitboard;
use crate::config::evaluation as cfg;
use crate::piece::{Color, PieceKind};
use crate::position::Position;
use crate::square::Square;

fn file_mask(file: usize) -> Bitboard {
    Bitboard(Bitboard::FILE_A.0 << file)
}

/// Squares strictly ahead of `sq` (toward promotion) on `sq`'s file, for `color`.
fn ahead_mask(sq: Square, color: Color) -> u64 {
    let rank = sq.rank();
    if color == Color::White {
        if rank >= 7 {
            0
        } else {
            !((1u64 << ((rank + 1) * 8)) - 1)
        }
    } else if rank == 0 {
        0
    } else {
        (1u64 << (rank * 8)) - 1
    }
}

fn is_passed(sq: Square, color: Color, opposing_pawns: Bitboard) -> bool {
    let file = sq.file();
    let mut adjacent = file_mask(file).0;
    if file > 0 {
        adjacent |= file_mask(file - 1).0;
    }
    if file < 7 {
        adjacent |= file_mask(file + 1).0;
    }
    opposing_pawns.0 & adjacent & ahead_mask(sq, color) == 0
}

fn pst_index(color: Color, sq: Square) -> usize {
    let rank = if color == Color::White { 7 - sq.rank() } else { sq.rank() };
    rank * 8 + sq.file()
}

/// White-minus-black pawn score, `(mg, eg)`.
pub fn pawn_structure(pos: &Position) -> (i32, i32) {
    let mut mg = 0i32;
    let mut eg = 0i32;

    let white_pawns = pos.pieces_of(Color::White, PieceKind::Pawn);
    let black_pawns = pos.pieces_of(Color::Black, PieceKind::Pawn);

    for color in [Color::White, Color::Black] {
        let sign = if color == Color::White { 1 } else { -1 };
        let own = if color == Color::White { white_pawns } else { black_pawns };
        let opp = if color == Color::White { black_pawns } else { white_pawns };

        for sq in own.iter() {
            let pst = pst_index(color, sq);
            mg += sign * cfg::PAWN_PST_MG[pst];
            eg += sign * cfg::PAWN_PST_EG[pst];

            let file = sq.file();
            let same_file_count = (own.0 & file_mask(file).0).count_ones();
            if same_file_count > 1 {
                mg += sign * cfg::DOUBLED_PAWN_MG;
                eg += sign * cfg::DOUBLED_PAWN_EG;
            }

            let left = if file > 0 { own.0 & file_mask(file - 1).0 } else { 0 };
            let right = if file < 7 { own.0 & file_mask(file + 1).0 } else { 0 };
            let passed = is_passed(sq, color, opp);

            if left == 0 && right == 0 {
                mg += sign * (cfg::ISOLATED_PAWN_MG + cfg::ISOLATED_OPEN_MG * i32::from(passed));
                eg += sign * (cfg::ISOLATED_PAWN_EG + cfg::ISOLATED_OPEN_EG * i32::from(passed));
            } else {
                let rank = sq.rank();
                let support_rank = if color == Color::White {
                    rank.checked_sub(1)
                } else {
                    rank.checked_add(1).filter(|r| *r < 8)
                };
                let supported = support_rank.is_some_and(|r| {
                    let mut support_mask = 0u64;
                    if file > 0 {
                        support_mask |= 1u64 << (r * 8 + file - 1);
                    }
                    if file < 7 {
                        support_mask |= 1u64 << (r * 8 + file + 1);
                    }
                    own.0 & support_mask != 0
                });
                if !supported {
                    mg += sign * (cfg::BACKWARD_PAWN_MG + cfg::BACKWARD_OPEN_MG * i32::from(passed));
                    eg += sign * (cfg::BACKWARD_PAWN_EG + cfg::BACKWARD_OPEN_EG * i32::from(passed));
                } else {
                    mg += sign * cfg::P_SUPPORT[pst];
                }
            }

            if passed {
                let rank_from_promotion = if color == Color::White { 7 - sq.rank() } else { sq.rank() };
                let bonus = cfg::PASSED_PAWN_BASE + (7 - rank_from_promotion as i32) * cfg::PASSED_PAWN_PER_RANK;
                mg += sign * bonus;
            }
        }
    }

    (mg, eg)
}
