//! Error types, one per concern, matching the boundary that produces them.
//!
//! Lower-level functions (`Position::from_fen`, `movegen::generate_legal_moves`)
//! return their own precise error type directly. `EngineError` composes all of
//! them at the `Engine` facade via `From` impls so callers driving `apply`/
//! `select_move` only need to match on one type.

use std::fmt;

/// A square string did not parse as algebraic notation (e.g. `"e4"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquareParseError {
    pub notation: String,
}

impl fmt::Display for SquareParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid square notation '{}'", self.notation)
    }
}

impl std::error::Error for SquareParseError {}

/// A FEN string was malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenParseError {
    WrongFieldCount { found: usize },
    InvalidPiecePlacement { rank: usize, reason: String },
    InvalidSideToMove { found: String },
    InvalidCastlingRights { found: String },
    InvalidEnPassantSquare { found: String },
    InvalidHalfmoveClock { found: String },
    InvalidFullmoveNumber { found: String },
    /// The FEN parsed field-by-field but the resulting position violates a
    /// structural invariant (see [`IllegalPositionError`]).
    IllegalPosition(IllegalPositionError),
}

impl fmt::Display for FenParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenParseError::WrongFieldCount { found } => {
                write!(f, "FEN must have 6 space-separated fields, found {found}")
            }
            FenParseError::InvalidPiecePlacement { rank, reason } => {
                write!(f, "invalid piece placement on rank {rank}: {reason}")
            }
            FenParseError::InvalidSideToMove { found } => {
                write!(f, "invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenParseError::InvalidCastlingRights { found } => {
                write!(f, "invalid castling rights field '{found}'")
            }
            FenParseError::InvalidEnPassantSquare { found } => {
                write!(f, "invalid en passant square '{found}'")
            }
            FenParseError::InvalidHalfmoveClock { found } => {
                write!(f, "invalid halfmove clock '{found}'")
            }
            FenParseError::InvalidFullmoveNumber { found } => {
                write!(f, "invalid fullmove number '{found}'")
            }
            FenParseError::IllegalPosition(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for FenParseError {}

impl From<IllegalPositionError> for FenParseError {
    fn from(e: IllegalPositionError) -> Self {
        FenParseError::IllegalPosition(e)
    }
}

/// A fully constructed position violates a structural invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IllegalPositionError {
    MissingKing { color_is_white: bool },
    MultipleKings { color_is_white: bool },
    OpponentInCheck,
    TooManyPawns { color_is_white: bool, count: u32 },
}

impl fmt::Display for IllegalPositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllegalPositionError::MissingKing { color_is_white } => {
                write!(f, "position has no {} king", side(*color_is_white))
            }
            IllegalPositionError::MultipleKings { color_is_white } => {
                write!(f, "position has more than one {} king", side(*color_is_white))
            }
            IllegalPositionError::OpponentInCheck => {
                write!(f, "side not to move is in check")
            }
            IllegalPositionError::TooManyPawns { color_is_white, count } => {
                write!(f, "{} has {count} pawns, more than the board allows", side(*color_is_white))
            }
        }
    }
}

impl std::error::Error for IllegalPositionError {}

fn side(is_white: bool) -> &'static str {
    if is_white {
        "white"
    } else {
        "black"
    }
}

/// A move proposed by an external caller is not in the legal move list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllegalMoveError {
    pub attempted: String,
}

impl fmt::Display for IllegalMoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a legal move in this position", self.attempted)
    }
}

impl std::error::Error for IllegalMoveError {}

/// Search was requested at a position with no legal moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoLegalMovesError;

impl fmt::Display for NoLegalMovesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no legal moves available, position is terminal")
    }
}

impl std::error::Error for NoLegalMovesError {}

/// Cooperative cancellation tripped before any search iteration completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "search cancelled before completing an iteration")
    }
}

impl std::error::Error for Cancelled {}

/// Unified error type at the `Engine` facade boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    FenParse(FenParseError),
    IllegalPosition(IllegalPositionError),
    IllegalMove(IllegalMoveError),
    NoLegalMoves(NoLegalMovesError),
    Cancelled(Cancelled),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::FenParse(e) => write!(f, "{e}"),
            EngineError::IllegalPosition(e) => write!(f, "{e}"),
            EngineError::IllegalMove(e) => write!(f, "{e}"),
            EngineError::NoLegalMoves(e) => write!(f, "{e}"),
            EngineError::Cancelled(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<FenParseError> for EngineError {
    fn from(e: FenParseError) -> Self {
        EngineError::FenParse(e)
    }
}

impl From<IllegalPositionError> for EngineError {
    fn from(e: IllegalPositionError) -> Self {
        EngineError::IllegalPosition(e)
    }
}

impl From<IllegalMoveError> for EngineError {
    fn from(e: IllegalMoveError) -> Self {
        EngineError::IllegalMove(e)
    }
}

impl From<NoLegalMovesError> for EngineError {
    fn from(e: NoLegalMovesError) -> Self {
        EngineError::NoLegalMoves(e)
    }
}

impl From<Cancelled> for EngineError {
    fn from(e: Cancelled) -> Self {
        EngineError::Cancelled(e)
    }
}
