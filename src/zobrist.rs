//! Incremental structural hashing of board positions
//!
//! Two boards with the same occupancy per player and the same side-to-move
//! parity always hash identically, regardless of the move order that
//! produced them.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bitboard::{BitBoard, Player};
use crate::{HEIGHT, WIDTH};

/// Seed for the default constant table
///
/// Hashes stored in precomputed-move datasets are only valid against the
/// table this seed generates, so it must not change between releases.
pub const DEFAULT_SEED: u64 = 0x00c4_ab5e_ed15_900d;

const CELLS: usize = WIDTH * HEIGHT;

/// Table of per-(player, column, row) random constants plus a side-to-move
/// constant, generated once from a fixed seed and shared read-only
#[derive(Clone)]
pub struct ZobristHasher {
    table: [u64; 2 * CELLS],
    side_to_move: u64,
}

impl ZobristHasher {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut table = [0u64; 2 * CELLS];
        for constant in table.iter_mut() {
            *constant = rng.gen();
        }
        Self {
            table,
            side_to_move: rng.gen(),
        }
    }

    /// Full recomputation by folding the constant of every occupied cell
    pub fn compute_hash(&self, board: &BitBoard) -> u64 {
        let mut hash = 0;
        for &player in &[Player::One, Player::Two] {
            let pieces = board.piece_mask(player);
            for column in 0..WIDTH {
                for row in 0..HEIGHT {
                    let bit = 1u64 << (column * (HEIGHT + 1) + row);
                    if pieces & bit != 0 {
                        hash ^= self.piece_constant(player, column, row);
                    }
                }
            }
        }
        if board.num_moves() % 2 == 1 {
            hash ^= self.side_to_move;
        }
        hash
    }

    /// Hash of the position after `player` drops a tile at `(column, row)`
    ///
    /// `row` is the landing height before the move, as reported by
    /// [`BitBoard::height`].
    pub fn update_hash(&self, hash: u64, column: usize, row: usize, player: Player) -> u64 {
        hash ^ self.piece_constant(player, column, row) ^ self.side_to_move
    }

    fn piece_constant(&self, player: Player, column: usize, row: usize) -> u64 {
        self.table[player.index() * CELLS + column * HEIGHT + row]
    }
}

impl Default for ZobristHasher {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
