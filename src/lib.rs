//! A time-budgeted agent for playing the board game 'Connect 4'
//!
//! The engine combines a bitboard game state, a negamax tree search with
//! alpha-beta pruning, a Zobrist-keyed transposition table and an iterative
//! deepening driver into an anytime move calculator: given a time budget it
//! always answers with a legal column, using whatever search depth the
//! budget allowed.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_engine::{solver::Solver, bitboard::BitBoard};
//! use std::time::Duration;
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let mut solver = Solver::new(BitBoard::from_moves(&[3, 3, 2, 2])?);
//! let column = solver.compute_move(Duration::from_millis(50));
//!
//! assert!(column.is_some());
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod transposition_table;

pub mod bitboard;

pub mod zobrist;

pub mod evaluator;

pub mod book;

pub mod search;

pub mod solver;

mod test;

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

/// The number of moves in a completely filled board
pub const MAX_MOVES: usize = WIDTH * HEIGHT;

// ensure that the given dimensions fit in a u64 for the bitboard representation
const_assert!(WIDTH * (HEIGHT + 1) < 64);
