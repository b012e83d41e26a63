//! Transposition table: a fixed-size, direct-mapped, Zobrist-keyed cache of
//! search results. Grounded on the teacher's `TranspositionTable`, extended
//! with mate-score ply adjustment so a mate score found N plies below one
//! search root stays correct when reused from a shallower root.

use crate::config;
use crate::config::evaluation::MATE_SCORE;
use crate::moves::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundType {
    Exact,
    LowerBound,
    UpperBound,
}

#[derive(Clone, Copy, Debug)]
pub struct TTEntry {
    pub hash: u64,
    pub depth: u32,
    pub score: i32,
    pub bound_type: BoundType,
    pub best_move: Option<Move>,
    pub age: u8,
}

/// Outcome of a [`TranspositionTable::probe`].
pub enum ProbeResult {
    Miss,
    /// Hit whose stored depth was insufficient for the requested depth; the
    /// best-move hint is still useful for move ordering.
    MoveHint(Move),
    Exact(i32),
    LowerBound(i32),
    UpperBound(i32),
}

/// Adds `plies_from_root` to a mate score so it is stored relative to the
/// root rather than to wherever the `store` call happened. Scores that are
/// not mate scores pass through unchanged.
fn score_to_tt(score: i32, plies_from_root: u32) -> i32 {
    if score >= MATE_SCORE - 1000 {
        score + plies_from_root as i32
    } else if score <= -MATE_SCORE + 1000 {
        score - plies_from_root as i32
    } else {
        score
    }
}

/// Inverse of [`score_to_tt`], applied on probe.
fn score_from_tt(score: i32, plies_from_root: u32) -> i32 {
    if score >= MATE_SCORE - 1000 {
        score - plies_from_root as i32
    } else if score <= -MATE_SCORE + 1000 {
        score + plies_from_root as i32
    } else {
        score
    }
}

pub struct TranspositionTable {
    table: Vec<Option<TTEntry>>,
    mask: usize,
    age: u8,
}

impl TranspositionTable {
    /// Create a table sized to roughly `size_mb` megabytes, rounded down to a
    /// power of two entry count.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<Option<TTEntry>>();
        let mut num_entries = (size_mb * 1024 * 1024) / entry_size.max(1);
        num_entries = num_entries.next_power_of_two() / 2;
        if num_entries == 0 {
            num_entries = 1024;
        }
        TranspositionTable {
            table: vec![None; num_entries],
            mask: num_entries - 1,
            age: 0,
        }
    }

    /// Create a table with an explicit entry count, rounded down to a power
    /// of two. Used by tests that want a small, predictable table.
    #[must_use]
    pub fn with_entries(num_entries: usize) -> Self {
        let num_entries = num_entries.next_power_of_two().max(1);
        TranspositionTable {
            table: vec![None; num_entries],
            mask: num_entries - 1,
            age: 0,
        }
    }

    fn index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    /// Look up `hash`. A hit is usable against `alpha`/`beta` only when the
    /// stored depth is at least `depth`; a hit at a shallower depth still
    /// yields its best-move hint for ordering.
    #[must_use]
    pub fn probe(&self, hash: u64, depth: u32, alpha: i32, beta: i32, plies_from_root: u32) -> ProbeResult {
        #[cfg(feature = "logging")]
        log::trace!("tt probe hash={hash:016x} depth={depth} alpha={alpha} beta={beta}");
        let Some(entry) = &self.table[self.index(hash)] else {
            return ProbeResult::Miss;
        };
        if entry.hash != hash {
            return ProbeResult::Miss;
        }
        if entry.depth < depth {
            return match entry.best_move {
                Some(mv) => ProbeResult::MoveHint(mv),
                None => ProbeResult::Miss,
            };
        }
        let score = score_from_tt(entry.score, plies_from_root);
        match entry.bound_type {
            BoundType::Exact => ProbeResult::Exact(score),
            BoundType::LowerBound if score >= beta => ProbeResult::LowerBound(score),
            BoundType::UpperBound if score <= alpha => ProbeResult::UpperBound(score),
            _ => match entry.best_move {
                Some(mv) => ProbeResult::MoveHint(mv),
                None => ProbeResult::Miss,
            },
        }
    }

    /// Best-move hint only, regardless of whether the stored depth/bound
    /// would be usable for a cutoff. Used by move ordering and PV extraction.
    #[must_use]
    pub fn best_move(&self, hash: u64) -> Option<Move> {
        let entry = self.table[self.index(hash)].as_ref()?;
        (entry.hash == hash).then_some(entry.best_move).flatten()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn store(
        &mut self,
        hash: u64,
        depth: u32,
        score: i32,
        bound_type: BoundType,
        best_move: Option<Move>,
        plies_from_root: u32,
    ) {
        let index = self.index(hash);
        let should_replace = match &self.table[index] {
            Some(existing) => existing.hash == hash || depth >= existing.depth || existing.age != self.age,
            None => true,
        };
        if !should_replace {
            return;
        }
        #[cfg(feature = "logging")]
        log::trace!("tt store hash={hash:016x} depth={depth} score={score} bound={bound_type:?}");
        self.table[index] = Some(TTEntry {
            hash,
            depth,
            score: score_to_tt(score, plies_from_root),
            bound_type,
            best_move,
            age: self.age,
        });
    }

    /// Bump the age counter so the next iterative-deepening pass prefers
    /// overwriting entries from a previous search call.
    pub fn new_search(&mut self) {
        self.age = self.age.wrapping_add(1);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(config::DEFAULT_TT_ENTRIES * std::mem::size_of::<Option<TTEntry>>() / (1024 * 1024))
    }
}
