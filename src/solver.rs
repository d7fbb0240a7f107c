//! An anytime agent for choosing the next move
//!
//! Repeatedly runs the fixed-depth search at increasing depth against a
//! shared deadline, always keeping the last fully-completed depth's answer
//! so a move is available the instant the budget runs out.

use std::time::{Duration, Instant};

use anyhow::Result;
use log::{debug, warn};

use crate::bitboard::{move_order, BitBoard};
use crate::evaluator::{Evaluator, EvaluatorKind};
use crate::search::{Search, SearchAborted, MATE_SCORE};
use crate::transposition_table::{SeedEntry, TranspositionTable};
use crate::zobrist::ZobristHasher;
use crate::MAX_MOVES;

/// Margin subtracted from the caller's budget so the driver returns before
/// the external deadline, covering the cost of the final unfinished ply
const TIME_BUFFER: Duration = Duration::from_micros(500);

/// An agent answering "best next column" within a time budget
///
/// Owns the board, the hasher, the evaluator and the position cache; the
/// cache's preloaded seed (if any) is kept across moves while
/// search-discovered entries are dropped whenever the root changes.
pub struct Solver {
    board: BitBoard,
    hasher: ZobristHasher,
    evaluator: Evaluator,
    table: TranspositionTable,
    node_count: usize,
}

impl Solver {
    /// Creates a new `Solver` from a board position
    pub fn new(board: BitBoard) -> Self {
        Self {
            board,
            hasher: ZobristHasher::default(),
            evaluator: Evaluator::default(),
            table: TranspositionTable::new(),
            node_count: 0,
        }
    }

    /// Creates a new `Solver` by replaying an ordered move list
    pub fn from_moves(moves: &[usize]) -> Result<Self> {
        Ok(Self::new(BitBoard::from_moves(moves)?))
    }

    /// Selects the heuristic variant
    pub fn with_evaluator(mut self, kind: EvaluatorKind) -> Self {
        self.evaluator = Evaluator::new(kind);
        self
    }

    /// Replaces the default hasher, e.g. for a differently seeded table
    pub fn with_hasher(mut self, hasher: ZobristHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Reuses an existing transposition table
    pub fn with_transposition_table(mut self, table: TranspositionTable) -> Self {
        self.table = table;
        self
    }

    /// Preloads the transposition table from an external dataset
    pub fn with_seed(mut self, entries: Vec<SeedEntry>) -> Self {
        self.table = TranspositionTable::with_seed(entries);
        self
    }

    pub fn board(&self) -> &BitBoard {
        &self.board
    }

    /// The number of nodes searched by this `Solver` so far (for diagnostics only)
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Applies a move to the owned board (an opponent's reply, usually)
    ///
    /// Returns `false` when the column is full.
    pub fn play(&mut self, column: usize) -> bool {
        self.board.make_move(column)
    }

    /// Computes the best column within the time budget
    ///
    /// Deepens one ply at a time until the deadline passes or the score
    /// proves a forced result, then answers with the deepest completed
    /// iteration's move. Returns `None` only when the board is full; if
    /// not even a depth-1 search fits the budget, the center-most legal
    /// column is returned instead.
    pub fn compute_move(&mut self, budget: Duration) -> Option<usize> {
        if self.board.is_full() {
            return None;
        }
        let deadline = Instant::now() + budget.saturating_sub(TIME_BUFFER);

        // scores in the table are relative to this root
        self.table.clear();

        let remaining = MAX_MOVES - self.board.num_moves();
        let mut best: Option<(i32, usize)> = None;
        let mut depth = 1;

        loop {
            let mut search = Search::new(
                &mut self.board,
                &self.evaluator,
                &mut self.table,
                &self.hasher,
            )
            .with_deadline(deadline);
            let result = search.root(depth, best.map(|(_, column)| column));
            self.node_count += search.node_count;

            match result {
                Err(SearchAborted) => break,
                Ok((score, column)) => {
                    debug!(
                        "depth {} complete: score {}, best column {}",
                        depth, score, column
                    );
                    best = Some((score, column));
                    // a proven win or loss cannot improve with more depth
                    if score.abs() >= MATE_SCORE - remaining as i32 {
                        break;
                    }
                    if depth >= remaining {
                        break;
                    }
                    depth += 1;
                }
            }
        }

        match best {
            Some((_, column)) => Some(column),
            None => {
                warn!("budget too small for a depth-1 search, falling back to a static move");
                self.fallback_move()
            }
        }
    }

    /// Fixed-depth search with no deadline
    ///
    /// The batch counterpart of [`compute_move`](Self::compute_move):
    /// searching to `MAX_MOVES` ply solves the position exactly. Returns
    /// the score and best column, or `None` when the board is full.
    pub fn search_to_depth(&mut self, depth: usize) -> Option<(i32, usize)> {
        if self.board.is_full() {
            return None;
        }
        self.table.clear();

        let mut search = Search::new(
            &mut self.board,
            &self.evaluator,
            &mut self.table,
            &self.hasher,
        );
        let result = search.root(depth, None);
        self.node_count += search.node_count;

        // without a deadline the search cannot abort
        result.ok()
    }

    // center-most playable column
    fn fallback_move(&self) -> Option<usize> {
        move_order()
            .iter()
            .copied()
            .find(|&column| self.board.playable(column))
    }
}
