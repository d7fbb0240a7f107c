//! Cache from Zobrist hash to previously computed search results

use std::collections::hash_map::{Entry as MapEntry, HashMap};

/// How a stored score relates to the true value of the position
///
/// A beta cutoff proves only a lower bound and a fail-low only an upper
/// bound.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Copy, Clone, Debug)]
pub struct Entry {
    pub score: i32,
    pub depth: usize,
    pub best_move: Option<usize>,
    pub bound: Bound,
}

/// One record of an externally precomputed move dataset
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SeedEntry {
    pub hash: u64,
    pub score: i32,
    pub depth: u8,
    pub best_move: usize,
}

/// Position cache with depth-preferred replacement
///
/// Entries preloaded from a seed dataset survive [`clear`](Self::clear);
/// clearing only drops what the search discovered since.
#[derive(Clone, Default)]
pub struct TranspositionTable {
    entries: HashMap<u64, Entry>,
    seed: Vec<SeedEntry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table preloaded with an external dataset
    pub fn with_seed(seed: Vec<SeedEntry>) -> Self {
        let mut table = Self {
            entries: HashMap::with_capacity(seed.len()),
            seed,
        };
        table.apply_seed();
        table
    }

    fn apply_seed(&mut self) {
        for entry in &self.seed {
            self.entries.insert(
                entry.hash,
                Entry {
                    score: entry.score,
                    depth: entry.depth as usize,
                    best_move: Some(entry.best_move),
                    bound: Bound::Exact,
                },
            );
        }
    }

    /// Depth-preferred replace-or-insert
    ///
    /// A shallower result never evicts a deeper, more trustworthy one.
    pub fn store(&mut self, hash: u64, score: i32, depth: usize, best_move: Option<usize>, bound: Bound) {
        let new = Entry {
            score,
            depth,
            best_move,
            bound,
        };
        match self.entries.entry(hash) {
            MapEntry::Vacant(slot) => {
                slot.insert(new);
            }
            MapEntry::Occupied(mut slot) => {
                if depth >= slot.get().depth {
                    slot.insert(new);
                }
            }
        }
    }

    /// Returns a stored result usable at the given depth and window
    ///
    /// The stored depth must cover the requested depth and the bound kind
    /// must clear the `[alpha, beta)` fence: exact scores always do, lower
    /// bounds only at or above beta, upper bounds only at or below alpha.
    pub fn probe(&self, hash: u64, depth: usize, alpha: i32, beta: i32) -> Option<(i32, Option<usize>)> {
        let entry = self.entries.get(&hash)?;
        if entry.depth < depth {
            return None;
        }
        let usable = match entry.bound {
            Bound::Exact => true,
            Bound::Lower => entry.score >= beta,
            Bound::Upper => entry.score <= alpha,
        };
        if usable {
            Some((entry.score, entry.best_move))
        } else {
            None
        }
    }

    /// Best move regardless of stored depth, for move ordering only
    pub fn best_move(&self, hash: u64) -> Option<usize> {
        self.entries.get(&hash).and_then(|entry| entry.best_move)
    }

    /// Score regardless of stored depth, for move ordering only
    pub fn score(&self, hash: u64) -> Option<i32> {
        self.entries.get(&hash).map(|entry| entry.score)
    }

    /// Drops all search-discovered entries and re-applies the seed
    pub fn clear(&mut self) {
        self.entries.clear();
        self.apply_seed();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
