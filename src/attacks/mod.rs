//! Precomputed attack tables for every piece kind.
//!
//! Leaper attacks (pawn, knight, king) are plain 64-entry tables. Sliding
//! pieces (bishop, rook, queen) use the flattened occupancy-indexed table
//! from the teacher's magic module: for each square, every subset of the
//! square's "relevant occupancy" mask is enumerated and its ray-walked
//! attack set stored contiguously, with per-square offsets into one flat
//! `Vec`. This avoids per-square `Vec` indirection and keeps the whole
//! table cache-friendly.

use once_cell::sync::Lazy;

use crate::bitboard::Bitboard;
use crate::piece::Color;
use crate::square::Square;

static KNIGHT_ATTACKS: Lazy<[Bitboard; 64]> = Lazy::new(|| {
    let mut table = [Bitboard::EMPTY; 64];
    const DELTAS: [(isize, isize); 8] = [
        (2, 1),
        (1, 2),
        (-1, 2),
        (-2, 1),
        (-2, -1),
        (-1, -2),
        (1, -2),
        (2, -1),
    ];
    for sq in 0..64 {
        table[sq] = leaper_mask(sq, &DELTAS);
    }
    table
});

static KING_ATTACKS: Lazy<[Bitboard; 64]> = Lazy::new(|| {
    let mut table = [Bitboard::EMPTY; 64];
    const DELTAS: [(isize, isize); 8] = [
        (1, 0),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ];
    for sq in 0..64 {
        table[sq] = leaper_mask(sq, &DELTAS);
    }
    table
});

/// `[color][square]`
static PAWN_ATTACKS: Lazy<[[Bitboard; 64]; 2]> = Lazy::new(|| {
    let mut table = [[Bitboard::EMPTY; 64]; 2];
    for sq in 0..64 {
        table[Color::White.index()][sq] = leaper_mask(sq, &[(1, -1), (1, 1)]);
        table[Color::Black.index()][sq] = leaper_mask(sq, &[(-1, -1), (-1, 1)]);
    }
    table
});

fn leaper_mask(sq: usize, deltas: &[(isize, isize)]) -> Bitboard {
    let rank = (sq / 8) as isize;
    let file = (sq % 8) as isize;
    let mut mask = Bitboard::EMPTY;
    for (dr, df) in deltas {
        let r = rank + dr;
        let f = file + df;
        if (0..8).contains(&r) && (0..8).contains(&f) {
            mask.set(Square::new(r as usize, f as usize));
        }
    }
    mask
}

/// Flattened occupancy-indexed attack table for one sliding piece.
struct SliderTable {
    masks: [Bitboard; 64],
    offsets: [usize; 64],
    flat: Vec<Bitboard>,
}

impl SliderTable {
    fn build(directions: &[(isize, isize)]) -> Self {
        let mut masks = [Bitboard::EMPTY; 64];
        for (sq, mask) in masks.iter_mut().enumerate() {
            *mask = relevant_occupancy_mask(sq, directions);
        }

        let mut offsets = [0usize; 64];
        let mut flat = Vec::new();
        for sq in 0..64 {
            let mask = masks[sq];
            let bits: Vec<usize> = (0..64).filter(|&i| mask.test(Square::from_index(i))).collect();
            offsets[sq] = flat.len();
            let subset_count = 1usize << bits.len();
            for subset in 0..subset_count {
                let mut blockers = Bitboard::EMPTY;
                for (j, &bit_sq) in bits.iter().enumerate() {
                    if (subset >> j) & 1 != 0 {
                        blockers.set(Square::from_index(bit_sq));
                    }
                }
                flat.push(ray_attacks(sq, blockers, directions));
            }
        }

        SliderTable { masks, offsets, flat }
    }

    fn attacks(&self, sq: Square, occupancy: Bitboard) -> Bitboard {
        let idx = sq.index();
        let mask = self.masks[idx];
        let blockers = Bitboard(occupancy.0 & mask.0);
        let mut subset_index = 0usize;
        let mut bit = 0usize;
        for i in 0..64 {
            if mask.test(Square::from_index(i)) {
                if blockers.test(Square::from_index(i)) {
                    subset_index |= 1usize << bit;
                }
                bit += 1;
            }
        }
        self.flat[self.offsets[idx] + subset_index]
    }
}

/// Occupancy mask excluding the board edge in each sliding direction: the
/// edge square itself never needs a blocker bit because a slider always
/// "sees" it regardless of what else occupies it.
fn relevant_occupancy_mask(sq: usize, directions: &[(isize, isize)]) -> Bitboard {
    let rank = (sq / 8) as isize;
    let file = (sq % 8) as isize;
    let mut mask = Bitboard::EMPTY;
    for (dr, df) in directions {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let next_r = r + dr;
            let next_f = f + df;
            if !(0..8).contains(&next_r) || !(0..8).contains(&next_f) {
                break;
            }
            mask.set(Square::new(r as usize, f as usize));
            r = next_r;
            f = next_f;
        }
    }
    mask
}

fn ray_attacks(sq: usize, occupancy: Bitboard, directions: &[(isize, isize)]) -> Bitboard {
    let rank = (sq / 8) as isize;
    let file = (sq % 8) as isize;
    let mut attacks = Bitboard::EMPTY;
    for (dr, df) in directions {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let target = Square::new(r as usize, f as usize);
            attacks.set(target);
            if occupancy.test(target) {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

const ROOK_DIRECTIONS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

static ROOK_TABLE: Lazy<SliderTable> = Lazy::new(|| SliderTable::build(&ROOK_DIRECTIONS));
static BISHOP_TABLE: Lazy<SliderTable> = Lazy::new(|| SliderTable::build(&BISHOP_DIRECTIONS));

#[inline]
#[must_use]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index()]
}

#[inline]
#[must_use]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index()]
}

#[inline]
#[must_use]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index()]
}

#[inline]
#[must_use]
pub fn bishop_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    BISHOP_TABLE.attacks(sq, occupancy)
}

#[inline]
#[must_use]
pub fn rook_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    ROOK_TABLE.attacks(sq, occupancy)
}

#[inline]
#[must_use]
pub fn queen_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    Bitboard(bishop_attacks(sq, occupancy).0 | rook_attacks(sq, occupancy).0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knight_from_corner_has_two_targets() {
        let attacks = knight_attacks(Square::new(0, 0));
        assert_eq!(attacks.popcount(), 2);
    }

    #[test]
    fn king_from_center_has_eight_targets() {
        let attacks = king_attacks(Square::new(3, 3));
        assert_eq!(attacks.popcount(), 8);
    }

    #[test]
    fn white_pawn_attacks_diagonally_forward() {
        let attacks = pawn_attacks(Color::White, Square::new(3, 3));
        assert!(attacks.test(Square::new(4, 2)));
        assert!(attacks.test(Square::new(4, 4)));
        assert_eq!(attacks.popcount(), 2);
    }

    #[test]
    fn rook_attacks_stop_at_first_blocker() {
        let mut occupancy = Bitboard::EMPTY;
        occupancy.set(Square::new(0, 4));
        let attacks = rook_attacks(Square::new(0, 0), occupancy);
        assert!(attacks.test(Square::new(0, 4)));
        assert!(!attacks.test(Square::new(0, 5)));
    }

    #[test]
    fn bishop_attacks_from_center_on_empty_board() {
        let attacks = bishop_attacks(Square::new(3, 3), Bitboard::EMPTY);
        assert!(attacks.test(Square::new(0, 0)));
        assert!(attacks.test(Square::new(7, 7)));
    }

    #[test]
    fn queen_attacks_union_rook_and_bishop() {
        let occ = Bitboard::EMPTY;
        let queen = queen_attacks(Square::new(3, 3), occ);
        let rook = rook_attacks(Square::new(3, 3), occ);
        let bishop = bishop_attacks(Square::new(3, 3), occ);
        assert_eq!(queen.0, rook.0 | bishop.0);
    }
}
