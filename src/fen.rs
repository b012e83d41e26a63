//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use crate::castling::CastlingRights;
use crate::error::FenParseError;
use crate::piece::{Color, Piece};
use crate::position::Position;
use crate::square::Square;

pub fn parse(fen: &str) -> Result<Position, FenParseError> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(FenParseError::WrongFieldCount { found: parts.len() });
    }

    let mut pos = Position::empty();

    let ranks: Vec<&str> = parts[0].split('/').collect();
    if ranks.len() != 8 {
        return Err(FenParseError::InvalidPiecePlacement {
            rank: ranks.len(),
            reason: "expected 8 ranks separated by '/'".to_string(),
        });
    }
    for (rank_from_top, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - rank_from_top;
        let mut file = 0usize;
        for c in rank_str.chars() {
            if let Some(skip) = c.to_digit(10) {
                file += skip as usize;
                continue;
            }
            if file >= 8 {
                return Err(FenParseError::InvalidPiecePlacement {
                    rank,
                    reason: format!("too many files in rank ({file} >= 8)"),
                });
            }
            let piece = Piece::from_fen_char(c).ok_or_else(|| FenParseError::InvalidPiecePlacement {
                rank,
                reason: format!("invalid piece character '{c}'"),
            })?;
            pos.set_piece(Square::new(rank, file), piece);
            file += 1;
        }
        if file != 8 {
            return Err(FenParseError::InvalidPiecePlacement {
                rank,
                reason: format!("rank covers {file} files, expected 8"),
            });
        }
    }

    pos.turn = match parts[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => {
            return Err(FenParseError::InvalidSideToMove {
                found: other.to_string(),
            })
        }
    };

    let mut rights = CastlingRights::NONE;
    if parts[2] != "-" {
        for c in parts[2].chars() {
            rights.insert(match c {
                'K' => CastlingRights::WHITE_KINGSIDE,
                'Q' => CastlingRights::WHITE_QUEENSIDE,
                'k' => CastlingRights::BLACK_KINGSIDE,
                'q' => CastlingRights::BLACK_QUEENSIDE,
                _ => {
                    return Err(FenParseError::InvalidCastlingRights {
                        found: parts[2].to_string(),
                    })
                }
            });
        }
    }
    pos.castling_rights = rights;

    pos.en_passant_target = if parts[3] == "-" {
        None
    } else {
        Some(parts[3].parse::<Square>().map_err(|_| FenParseError::InvalidEnPassantSquare {
            found: parts[3].to_string(),
        })?)
    };

    pos.halfmove_clock = if parts.len() >= 5 {
        parts[4].parse().map_err(|_| FenParseError::InvalidHalfmoveClock {
            found: parts[4].to_string(),
        })?
    } else {
        0
    };

    pos.fullmove_number = if parts.len() >= 6 {
        parts[5].parse().map_err(|_| FenParseError::InvalidFullmoveNumber {
            found: parts[5].to_string(),
        })?
    } else {
        1
    };

    pos.validate()?;
    pos.hash = pos.compute_hash_from_scratch();
    pos.push_repetition();
    Ok(pos)
}

impl Position {
    pub fn from_fen(s: &str) -> Result<Position, FenParseError> {
        parse(s)
    }

    #[must_use]
    pub fn to_fen(&self) -> String {
        to_fen(self)
    }
}

#[must_use]
pub fn to_fen(pos: &Position) -> String {
    let mut ranks = Vec::with_capacity(8);
    for rank in (0..8).rev() {
        let mut row = String::new();
        let mut empty = 0u32;
        for file in 0..8 {
            let sq = Square::new(rank, file);
            if let Some(piece) = pos.piece_at(sq) {
                if empty > 0 {
                    row.push_str(&empty.to_string());
                    empty = 0;
                }
                row.push(piece.to_fen_char());
            } else {
                empty += 1;
            }
        }
        if empty > 0 {
            row.push_str(&empty.to_string());
        }
        ranks.push(row);
    }

    let side = if pos.turn() == Color::White { "w" } else { "b" };

    let mut castling = String::new();
    let rights = pos.castling_rights();
    if rights.contains(CastlingRights::WHITE_KINGSIDE) {
        castling.push('K');
    }
    if rights.contains(CastlingRights::WHITE_QUEENSIDE) {
        castling.push('Q');
    }
    if rights.contains(CastlingRights::BLACK_KINGSIDE) {
        castling.push('k');
    }
    if rights.contains(CastlingRights::BLACK_QUEENSIDE) {
        castling.push('q');
    }
    if castling.is_empty() {
        castling.push('-');
    }

    let ep = pos.en_passant_target().map_or_else(|| "-".to_string(), |sq| sq.to_string());

    format!(
        "{} {} {} {} {} {}",
        ranks.join("/"),
        side,
        castling,
        ep,
        pos.halfmove_clock(),
        pos.fullmove_number()
    )
}
