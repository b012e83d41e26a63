//! `Engine`: the facade a caller drives instead of touching `Position`,
//! `movegen`, and `search` directly. Owns the transposition table and the
//! move-ordering heuristics that should persist across calls to
//! [`Engine::select_move`].

use crate::config;
use crate::error::{EngineError, IllegalMoveError};
use crate::movegen;
use crate::moves::Move;
use crate::position::Position;
use crate::search::{self, AiLevel, HistoryTable, KillerTable, SearchOptions, SearchResult};
use crate::tt::TranspositionTable;

/// Owns search state (transposition table, killer moves, history heuristic)
/// across calls. A single `Engine` must not be driven by two concurrent
/// searches; see the crate's concurrency design notes.
pub struct Engine {
    tt: TranspositionTable,
    killers: KillerTable,
    history: HistoryTable,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Engine::with_tt_entries(config::DEFAULT_TT_ENTRIES)
    }

    #[must_use]
    pub fn with_tt_entries(num_entries: usize) -> Self {
        Engine {
            tt: TranspositionTable::with_entries(num_entries),
            killers: KillerTable::new(128),
            history: HistoryTable::new(),
        }
    }

    /// Apply `mv` to `position`, validating it is among `position`'s legal
    /// moves first. Never mutates `position` on rejection.
    pub fn apply(&self, position: &Position, mv: Move) -> Result<Position, EngineError> {
        let legal = movegen::generate_legal_moves(position);
        if !legal.contains(&mv) {
            return Err(EngineError::IllegalMove(IllegalMoveError {
                attempted: mv.to_string(),
            }));
        }
        let mut next = position.clone();
        next.make(mv);
        Ok(next)
    }

    /// Discard all accumulated search state (transposition table entries,
    /// killer moves, history scores). Use between unrelated searches so
    /// heuristics tuned to one position don't bias move ordering on another.
    pub fn reset(&mut self) {
        let num_entries = self.tt.len();
        self.tt = TranspositionTable::with_entries(num_entries);
        self.killers = KillerTable::new(128);
        self.history = HistoryTable::new();
    }

    /// Search `position` to the depth `level` maps to, returning the best
    /// move found. Decays the history table and clears stale killer-move
    /// slack at the start of each call so heuristics from an unrelated
    /// earlier search don't linger.
    pub fn select_move(
        &mut self,
        position: &Position,
        level: AiLevel,
        options: SearchOptions<'_>,
    ) -> Result<SearchResult, EngineError> {
        self.history.decay();
        search::search_iterative(position, &mut self.tt, &mut self.killers, &mut self.history, level.depth(), &options)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen;
    use crate::piece::{Color, Piece, PieceKind};
    use crate::square::Square;

    #[test]
    fn apply_accepts_a_legal_move() {
        let engine = Engine::new();
        let pos = Position::startpos();
        let mv = Move {
            from: Square::new(1, 4),
            to: Square::new(3, 4),
            piece: Piece::new(Color::White, PieceKind::Pawn),
            captured: None,
            flags: crate::moves::MoveFlags::PAWN_DOUBLE_PUSH,
            promotion: None,
        };
        let next = engine.apply(&pos, mv).unwrap();
        assert_eq!(next.turn(), Color::Black);
    }

    #[test]
    fn apply_rejects_an_illegal_move() {
        let engine = Engine::new();
        let pos = Position::startpos();
        let mv = Move {
            from: Square::new(1, 4),
            to: Square::new(4, 4),
            piece: Piece::new(Color::White, PieceKind::Pawn),
            captured: None,
            flags: crate::moves::MoveFlags::NONE,
            promotion: None,
        };
        assert!(matches!(engine.apply(&pos, mv), Err(EngineError::IllegalMove(_))));
    }

    #[test]
    fn select_move_finds_the_winning_capture() {
        let mut engine = Engine::with_tt_entries(1 << 14);
        let pos = fen::parse("4k3/8/8/3r4/8/8/8/3RK3 w - - 0 1").unwrap();
        let result = engine.select_move(&pos, AiLevel::Three, SearchOptions::default()).unwrap();
        assert_eq!(result.best_move.to, Square::new(4, 3));
    }

    #[test]
    fn reset_clears_accumulated_history_scores() {
        let mut engine = Engine::with_tt_entries(1 << 10);
        let pos = Position::startpos();
        engine.select_move(&pos, AiLevel::Three, SearchOptions::default()).unwrap();
        assert!(!engine.tt.is_empty());
        let before_reset_len = engine.tt.len();
        engine.reset();
        assert_eq!(engine.tt.len(), before_reset_len);
        assert_eq!(engine.history.get(PieceKind::Pawn, Square::new(3, 4).index()), 0);
    }

    #[test]
    fn select_move_fails_at_a_terminal_position() {
        let mut engine = Engine::new();
        let pos = fen::parse("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
        assert!(matches!(
            engine.select_move(&pos, AiLevel::One, SearchOptions::default()),
            Err(EngineError::NoLegalMoves(_))
        ));
    }
}
