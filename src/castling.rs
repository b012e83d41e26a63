//! Castling rights, stored as four independent bits.

use std::ops::{BitOr, BitOrAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::piece::Color;

#[derive(Clone, Copy, PartialEq, Eq, Default, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const WHITE_KINGSIDE: CastlingRights = CastlingRights(1 << 0);
    pub const WHITE_QUEENSIDE: CastlingRights = CastlingRights(1 << 1);
    pub const BLACK_KINGSIDE: CastlingRights = CastlingRights(1 << 2);
    pub const BLACK_QUEENSIDE: CastlingRights = CastlingRights(1 << 3);
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        CastlingRights(bits & 0b1111)
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, other: CastlingRights) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: CastlingRights) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn remove(&mut self, other: CastlingRights) {
        self.0 &= !other.0;
    }

    #[inline]
    #[must_use]
    pub const fn kingside(color: Color) -> CastlingRights {
        match color {
            Color::White => CastlingRights::WHITE_KINGSIDE,
            Color::Black => CastlingRights::BLACK_KINGSIDE,
        }
    }

    #[inline]
    #[must_use]
    pub const fn queenside(color: Color) -> CastlingRights {
        match color {
            Color::White => CastlingRights::WHITE_QUEENSIDE,
            Color::Black => CastlingRights::BLACK_QUEENSIDE,
        }
    }

    #[inline]
    #[must_use]
    pub const fn both(color: Color) -> CastlingRights {
        match color {
            Color::White => CastlingRights(Self::WHITE_KINGSIDE.0 | Self::WHITE_QUEENSIDE.0),
            Color::Black => CastlingRights(Self::BLACK_KINGSIDE.0 | Self::BLACK_QUEENSIDE.0),
        }
    }
}

impl BitOr for CastlingRights {
    type Output = CastlingRights;
    fn bitor(self, rhs: Self) -> Self {
        CastlingRights(self.0 | rhs.0)
    }
}

impl BitOrAssign for CastlingRights {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
