//! Depth-limited negamax search with alpha-beta pruning
//!
//! The board is a single-owner mutable value threaded through the
//! recursion: every applied move is undone on every exit path, including
//! deadline aborts, so the caller always gets its board back unchanged.

use std::time::Instant;

use crate::bitboard::{move_order, BitBoard, Player};
use crate::evaluator::Evaluator;
use crate::transposition_table::{Bound, TranspositionTable};
use crate::zobrist::ZobristHasher;
use crate::WIDTH;

/// Score of a win on the next move from the search root
///
/// A forced win `n` plies from the root scores `MATE_SCORE - n`, a forced
/// loss `n - MATE_SCORE`; heuristic scores stay strictly inside the range.
pub const MATE_SCORE: i32 = 100_000;

/// The deadline passed mid-search and the partial result was discarded
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SearchAborted;

struct MoveSorter {
    size: usize,
    // column and ordering score
    moves: [(usize, i32); WIDTH],
}

impl MoveSorter {
    pub fn new() -> Self {
        Self {
            size: 0,
            moves: [(0, 0); WIDTH],
        }
    }
    pub fn push(&mut self, column: usize, score: i32) {
        let mut pos = self.size;
        self.size += 1;
        while pos != 0 && self.moves[pos - 1].1 > score {
            self.moves[pos] = self.moves[pos - 1];
            pos -= 1;
        }
        self.moves[pos] = (column, score);
    }
}

impl Iterator for MoveSorter {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        match self.size {
            0 => None,
            _ => {
                self.size -= 1;
                Some(self.moves[self.size].0)
            }
        }
    }
}

/// One search call over a borrowed board, cache and evaluator
pub struct Search<'a> {
    board: &'a mut BitBoard,
    evaluator: &'a Evaluator,
    table: &'a mut TranspositionTable,
    hasher: &'a ZobristHasher,
    deadline: Option<Instant>,

    /// The number of nodes visited so far (for diagnostics only)
    pub node_count: usize,
}

impl<'a> Search<'a> {
    pub fn new(
        board: &'a mut BitBoard,
        evaluator: &'a Evaluator,
        table: &'a mut TranspositionTable,
        hasher: &'a ZobristHasher,
    ) -> Self {
        Self {
            board,
            evaluator,
            table,
            hasher,
            deadline: None,
            node_count: 0,
        }
    }

    /// Aborts the search once this instant passes
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Top-level search returning the score and best column
    ///
    /// Unlike the recursive levels this never takes a transposition cutoff,
    /// since a move has to come back with the score. The previous
    /// iteration's best move is tried first when supplied.
    pub fn root(&mut self, depth: usize, pv_move: Option<usize>) -> Result<(i32, usize), SearchAborted> {
        debug_assert!(depth > 0);
        debug_assert!(!self.board.is_full());
        self.node_count += 1;

        let hash = self.hasher.compute_hash(self.board);
        let mover = self.board.to_move();

        let mut columns: Vec<usize> = self.order_moves(hash).collect();
        if let Some(pv) = pv_move {
            if let Some(i) = columns.iter().position(|&column| column == pv) {
                columns.remove(i);
                columns.insert(0, pv);
            }
        }

        let mut alpha = -MATE_SCORE;
        let beta = MATE_SCORE;
        let mut best_score = -MATE_SCORE;
        let mut best_move = columns[0];

        for column in columns {
            if self.out_of_time() {
                return Err(SearchAborted);
            }

            let row = self.board.height(column);
            let child_hash = self.hasher.update_hash(hash, column, row, mover);

            self.board.make_move(column);
            if self.board.check_win(mover) {
                self.board.undo_move(column);
                return Ok((MATE_SCORE - 1, column));
            }
            let result = self.negamax(depth - 1, -beta, -alpha, 1, child_hash);
            self.board.undo_move(column);
            let score = -result?;

            if score > best_score {
                best_score = score;
                best_move = column;
            }
            if score > alpha {
                alpha = score;
            }
        }

        Ok((best_score, best_move))
    }

    /// Performs game tree search below the root
    ///
    /// Returns the score of the position from the perspective of the side
    /// to move, or [`SearchAborted`] when the deadline passed.
    fn negamax(
        &mut self,
        depth: usize,
        mut alpha: i32,
        beta: i32,
        ply: i32,
        hash: u64,
    ) -> Result<i32, SearchAborted> {
        self.node_count += 1;

        // leaf: static evaluation, sign-adjusted for the side to move.
        // leaves are too numerous and too cheap to be worth a table slot
        if depth == 0 {
            let score = self.evaluator.evaluate(self.board);
            return Ok(match self.board.to_move() {
                Player::One => score,
                Player::Two => -score,
            });
        }

        // no moves left: draw
        if self.board.is_full() {
            return Ok(0);
        }

        if let Some((score, _)) = self.table.probe(hash, depth, alpha, beta) {
            return Ok(score);
        }

        let original_alpha = alpha;
        let mover = self.board.to_move();
        let mut best_score = -MATE_SCORE;
        let mut best_move = None;

        for column in self.order_moves(hash) {
            if self.out_of_time() {
                return Err(SearchAborted);
            }

            let row = self.board.height(column);
            let child_hash = self.hasher.update_hash(hash, column, row, mover);

            self.board.make_move(column);
            if self.board.check_win(mover) {
                // no sibling can win sooner than this move does
                self.board.undo_move(column);
                let score = MATE_SCORE - (ply + 1);
                self.table.store(hash, score, depth, Some(column), Bound::Exact);
                return Ok(score);
            }
            let result = self.negamax(depth - 1, -beta, -alpha, ply + 1, child_hash);
            self.board.undo_move(column);
            let score = -result?;

            if score > best_score {
                best_score = score;
                best_move = Some(column);
            }
            if score > alpha {
                alpha = score;
            }
            // a perfect opponent will not pick this branch, prune the rest
            if alpha >= beta {
                self.table.store(hash, best_score, depth, best_move, Bound::Lower);
                return Ok(best_score);
            }
        }

        let bound = if best_score <= original_alpha {
            Bound::Upper
        } else {
            Bound::Exact
        };
        self.table.store(hash, best_score, depth, best_move, bound);
        Ok(best_score)
    }

    /// Playable columns, best-looking first
    ///
    /// Moves whose resulting position is already cached are ranked by that
    /// score (negated: a position bad for the opponent is good for us);
    /// unknown moves keep the static center-first order. Pushing edge
    /// columns first makes ties pop out center-first.
    fn order_moves(&self, hash: u64) -> MoveSorter {
        let mover = self.board.to_move();
        let mut moves = MoveSorter::new();
        for i in (0..WIDTH).rev() {
            let column = move_order()[i];
            if !self.board.playable(column) {
                continue;
            }
            let row = self.board.height(column);
            let child_hash = self.hasher.update_hash(hash, column, row, mover);
            let score = self.table.score(child_hash).map(|s| -s).unwrap_or(0);
            moves.push(column, score);
        }
        moves
    }

    fn out_of_time(&self) -> bool {
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }
}
