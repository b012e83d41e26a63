//! Square indices and algebraic notation.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::SquareParseError;

/// A square on the board, stored as a compact 0-63 index.
///
/// Index layout: `rank * 8 + file`, so a1 = 0, b1 = 1, ..., h8 = 63.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square(u8);

impl Square {
    /// Build a square from rank and file, both 0..8. Out-of-range inputs wrap
    /// via the underlying arithmetic; callers working from trusted loop bounds
    /// (0..8) never observe this.
    #[inline]
    #[must_use]
    pub const fn new(rank: usize, file: usize) -> Self {
        Square((rank * 8 + file) as u8)
    }

    #[inline]
    #[must_use]
    pub const fn from_index(idx: usize) -> Self {
        Square(idx as u8)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    #[must_use]
    pub const fn rank(self) -> usize {
        (self.0 / 8) as usize
    }

    #[inline]
    #[must_use]
    pub const fn file(self) -> usize {
        (self.0 % 8) as usize
    }

    /// Square reflected across the board's horizontal midline (a1 <-> a8).
    #[inline]
    #[must_use]
    pub const fn flip_vertical(self) -> Self {
        Square(self.0 ^ 56)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file() as u8) as char, self.rank() + 1)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(SquareParseError {
                notation: s.to_string(),
            });
        }
        let file = bytes[0];
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(SquareParseError {
                notation: s.to_string(),
            });
        }
        Ok(Square::new((rank - b'1') as usize, (file - b'a') as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_index() {
        for idx in 0..64 {
            let sq = Square::from_index(idx);
            assert_eq!(sq.index(), idx);
        }
    }

    #[test]
    fn display_matches_algebraic() {
        assert_eq!(Square::new(0, 0).to_string(), "a1");
        assert_eq!(Square::new(7, 7).to_string(), "h8");
        assert_eq!(Square::new(3, 4).to_string(), "e4");
    }

    #[test]
    fn parse_round_trip() {
        for s in ["a1", "h8", "e4", "d5"] {
            let sq: Square = s.parse().unwrap();
            assert_eq!(sq.to_string(), s);
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("z1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("a".parse::<Square>().is_err());
    }
}
