//! Iterative-deepening driver: runs negamax alpha-beta at increasing depths,
//! keeping the last fully completed iteration's result if cancellation trips
//! mid-iteration.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::config::evaluation::MATE_SCORE;
use crate::config::search as cfg;
use crate::error::{Cancelled, EngineError, NoLegalMovesError};
use crate::eval;
use crate::movegen;
use crate::moves::Move;
use crate::position::Position;
use crate::tt::{BoundType, ProbeResult, TranspositionTable};

use super::move_order::{self, HistoryTable, KillerTable};

/// Per-call search tuning. `cancel`, when set, is polled every
/// `config::search::CANCELLATION_CHECK_INTERVAL` nodes.
pub struct SearchOptions<'a> {
    pub cancel: Option<&'a dyn Fn() -> bool>,
}

impl Default for SearchOptions<'_> {
    fn default() -> Self {
        SearchOptions { cancel: None }
    }
}

#[derive(Clone, Debug)]
pub struct SearchResult {
    pub best_move: Move,
    pub score: i32,
    pub depth: u32,
    pub nodes: u64,
    pub elapsed: Duration,
    pub pv: Vec<Move>,
}

#[allow(clippy::too_many_arguments)]
fn negamax(
    pos: &mut Position,
    tt: &mut TranspositionTable,
    killers: &mut KillerTable,
    history: &mut HistoryTable,
    depth: u32,
    ply: u32,
    mut alpha: i32,
    mut beta: i32,
    nodes: &mut u64,
    cancel: &dyn Fn() -> bool,
) -> Option<i32> {
    *nodes += 1;
    if *nodes % cfg::CANCELLATION_CHECK_INTERVAL == 0 && cancel() {
        return None;
    }

    if pos.is_draw() {
        return Some(0);
    }

    let in_check = movegen::is_in_check(pos, pos.turn());
    if depth == 0 {
        return Some(super::quiescence::quiesce(pos, alpha, beta, nodes));
    }

    let hash = pos.hash();
    let mut tt_hint = None;
    match tt.probe(hash, depth, alpha, beta, ply) {
        ProbeResult::Exact(score) => return Some(score),
        ProbeResult::LowerBound(score) => {
            alpha = alpha.max(score);
            tt_hint = tt.best_move(hash);
        }
        ProbeResult::UpperBound(score) => {
            beta = beta.min(score);
            tt_hint = tt.best_move(hash);
        }
        ProbeResult::MoveHint(mv) => tt_hint = Some(mv),
        ProbeResult::Miss => {}
    }
    if alpha >= beta {
        return Some(alpha);
    }

    let legal = movegen::generate_legal_moves(pos);
    if legal.is_empty() {
        return eval::terminal_score(pos, true, in_check, ply);
    }

    let mut ordered: Vec<Move> = legal.iter().copied().collect();
    move_order::order_moves(&mut ordered, tt_hint, &*killers, &*history, ply as usize);

    let original_alpha = alpha;
    let mut best_score = -MATE_SCORE * 2;
    let mut best_move = ordered[0];

    for mv in ordered {
        let undo = pos.make(mv);
        let child = negamax(pos, tt, killers, history, depth - 1, ply + 1, -beta, -alpha, nodes, cancel);
        pos.unmake(undo);

        let score = match child {
            Some(s) => -s,
            None => return None,
        };

        if score > best_score {
            best_score = score;
            best_move = mv;
        }
        alpha = alpha.max(score);
        if alpha >= beta {
            if mv.is_quiet() {
                killers.record(ply as usize, mv);
                history.record(mv.piece.kind, mv.to.index(), depth);
            }
            break;
        }
    }

    let bound = if best_score <= original_alpha {
        BoundType::UpperBound
    } else if best_score >= beta {
        BoundType::LowerBound
    } else {
        BoundType::Exact
    };
    tt.store(hash, depth, best_score, bound, Some(best_move), ply);
    Some(best_score)
}

/// Reconstruct the principal variation from the TT's best-move chain,
/// bounded by `max_len` and guarded against hash cycles.
fn reconstruct_pv(pos: &Position, tt: &TranspositionTable, max_len: u32) -> Vec<Move> {
    let mut pv = Vec::new();
    let mut scratch = pos.clone();
    let mut seen = HashSet::new();
    for _ in 0..max_len {
        if !seen.insert(scratch.hash()) {
            break;
        }
        let Some(mv) = tt.best_move(scratch.hash()) else {
            break;
        };
        if !movegen::generate_legal_moves(&scratch).contains(&mv) {
            break;
        }
        scratch.make(mv);
        pv.push(mv);
    }
    pv
}

/// Run iterative deepening from depth 1 to `max_depth`. Returns the best
/// result found before cancellation, if any iteration completed; otherwise
/// `Err(EngineError::Cancelled)`. `killers`/`history` persist across the call
/// so later iterations benefit from earlier ones' cutoffs.
pub fn search_iterative(
    pos: &Position,
    tt: &mut TranspositionTable,
    killers: &mut KillerTable,
    history: &mut HistoryTable,
    max_depth: u32,
    options: &SearchOptions,
) -> Result<SearchResult, EngineError> {
    let root_moves = movegen::generate_legal_moves(pos);
    if root_moves.is_empty() {
        return Err(EngineError::NoLegalMoves(NoLegalMovesError));
    }

    let cancel: &dyn Fn() -> bool = options.cancel.unwrap_or(&|| false);
    let start = Instant::now();
    let mut nodes = 0u64;
    let mut best: Option<SearchResult> = None;

    for depth in 1..=max_depth {
        tt.new_search();
        let mut scratch = pos.clone();
        let Some(score) = negamax(&mut scratch, tt, killers, history, depth, 0, -MATE_SCORE * 2, MATE_SCORE * 2, &mut nodes, cancel)
        else {
            #[cfg(feature = "logging")]
            log::warn!("search cancelled mid-iteration at depth={depth} nodes={nodes}");
            break;
        };
        let best_move = tt.best_move(pos.hash()).unwrap_or_else(|| *root_moves.iter().next().expect("checked non-empty above"));
        let pv = reconstruct_pv(pos, tt, depth);
        let elapsed = start.elapsed();
        #[cfg(feature = "logging")]
        log::debug!("search depth={depth} score={score} nodes={nodes} elapsed={elapsed:?}");
        best = Some(SearchResult {
            best_move,
            score,
            depth,
            nodes,
            elapsed,
            pv,
        });
    }

    best.ok_or(EngineError::Cancelled(Cancelled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen;

    fn fresh_tables() -> (TranspositionTable, KillerTable, HistoryTable) {
        (TranspositionTable::with_entries(1 << 14), KillerTable::new(64), HistoryTable::new())
    }

    #[test]
    fn finds_back_rank_mate_in_one() {
        let pos = fen::parse("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let (mut tt, mut killers, mut history) = fresh_tables();
        let result = search_iterative(&pos, &mut tt, &mut killers, &mut history, 3, &SearchOptions::default()).unwrap();
        assert_eq!(result.best_move.to.to_string(), "a8");
        assert!(result.score > MATE_SCORE - 100);
    }

    #[test]
    fn finds_foolsmate_response() {
        let pos = fen::parse("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
        assert!(movegen::generate_legal_moves(&pos).is_empty());
        let (mut tt, mut killers, mut history) = fresh_tables();
        let err = search_iterative(&pos, &mut tt, &mut killers, &mut history, 3, &SearchOptions::default()).unwrap_err();
        assert!(matches!(err, EngineError::NoLegalMoves(_)));
    }

    #[test]
    fn finds_foolsmate_delivering_move() {
        // After 1. f3 e5 2. g4, black to move: Qh4# is mate in one.
        let pos = fen::parse("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq g3 0 2").unwrap();
        let (mut tt, mut killers, mut history) = fresh_tables();
        let result = search_iterative(&pos, &mut tt, &mut killers, &mut history, 2, &SearchOptions::default()).unwrap();
        assert_eq!(result.best_move.from.to_string(), "d8");
        assert_eq!(result.best_move.to.to_string(), "h4");
        assert!(result.score > MATE_SCORE / 2);
    }

    #[test]
    fn stable_opening_choice_at_depth_four() {
        let pos = Position::startpos();
        let (mut tt, mut killers, mut history) = fresh_tables();
        let a = search_iterative(&pos, &mut tt, &mut killers, &mut history, 4, &SearchOptions::default()).unwrap();

        let (mut tt2, mut killers2, mut history2) = fresh_tables();
        let b = search_iterative(&pos, &mut tt2, &mut killers2, &mut history2, 4, &SearchOptions::default()).unwrap();
        assert_eq!(a.best_move, b.best_move);
    }

    #[test]
    fn standing_cancellation_stops_deepening_but_keeps_a_completed_result() {
        let pos = Position::startpos();
        let (mut tt, mut killers, mut history) = fresh_tables();
        let always_cancel = || true;
        let options = SearchOptions {
            cancel: Some(&always_cancel),
        };
        // Depth 1 on the opening position visits far fewer nodes than the
        // cancellation check interval, so it always completes; deeper
        // iterations then trip the check and are discarded.
        let result = search_iterative(&pos, &mut tt, &mut killers, &mut history, 6, &options).unwrap();
        assert!(result.depth < 6);
    }

    #[test]
    fn cancellation_with_no_legal_moves_reports_no_legal_moves_not_cancelled() {
        let pos = fen::parse("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
        assert!(movegen::generate_legal_moves(&pos).is_empty());
        let (mut tt, mut killers, mut history) = fresh_tables();
        let always_cancel = || true;
        let options = SearchOptions {
            cancel: Some(&always_cancel),
        };
        let err = search_iterative(&pos, &mut tt, &mut killers, &mut history, 6, &options).unwrap_err();
        assert!(matches!(err, EngineError::NoLegalMoves(_)));
    }
}
