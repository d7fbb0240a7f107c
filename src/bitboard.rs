use std::fmt;

use anyhow::{anyhow, Result};

use crate::{HEIGHT, WIDTH};

mod static_masks {
    use crate::{HEIGHT, WIDTH};

    pub const fn bottom_mask() -> u64 {
        let mut mask = 0;
        let mut column = 0;
        while column < WIDTH {
            mask |= 1 << (column * (HEIGHT + 1));
            column += 1;
        }
        mask
    }
    pub const fn full_board_mask() -> u64 {
        bottom_mask() * ((1 << HEIGHT as u64) - 1)
    }
}

/// One of the two players; player 1 moves first
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

/// Returns the columns ordered from the middle outwards, as the middle
/// columns are usually better moves and prune earlier
pub const fn move_order() -> [usize; WIDTH] {
    let mut move_order = [0; WIDTH];
    let mut i = 0;
    while i < WIDTH {
        move_order[i] = (WIDTH / 2) + (i % 2) * (i / 2 + 1) - (1 - i % 2) * (i / 2);
        i += 1;
    }
    move_order
}

/// Game state for a 7x6 board with gravity
///
/// Each column occupies a lane of `HEIGHT + 1` bits: the playable rows plus
/// one guard bit, so column-local arithmetic never crosses into a neighbour.
#[derive(Copy, Clone)]
pub struct BitBoard {
    // mask of the current player's tiles
    player_mask: u64,
    // mask of all tiles
    board_mask: u64,
    num_moves: usize,
}

impl BitBoard {
    pub fn new() -> Self {
        Self {
            player_mask: 0,
            board_mask: 0,
            num_moves: 0,
        }
    }

    /// Replays an ordered move list (players alternating, player 1 first)
    ///
    /// Out-of-range and full-column entries indicate a caller bug and fail
    /// loudly instead of being dropped.
    pub fn from_moves(moves: &[usize]) -> Result<Self> {
        let mut board = Self::new();

        for &column in moves {
            if column >= WIDTH {
                return Err(anyhow!("column {} out of range", column));
            }
            if !board.make_move(column) {
                return Err(anyhow!("invalid move list, column {} is full", column));
            }
        }
        Ok(board)
    }

    pub fn from_masks(player_mask: u64, board_mask: u64, num_moves: usize) -> Self {
        Self {
            player_mask,
            board_mask,
            num_moves,
        }
    }

    pub fn player_mask(&self) -> u64 {
        self.player_mask
    }

    pub fn board_mask(&self) -> u64 {
        self.board_mask
    }

    pub fn num_moves(&self) -> usize {
        self.num_moves
    }

    /// The player who makes the next move
    pub fn to_move(&self) -> Player {
        if self.num_moves % 2 == 0 {
            Player::One
        } else {
            Player::Two
        }
    }

    /// Mask of the given player's tiles
    pub fn piece_mask(&self, player: Player) -> u64 {
        if self.to_move() == player {
            self.player_mask
        } else {
            self.player_mask ^ self.board_mask
        }
    }

    pub fn top_mask(column: usize) -> u64 {
        1 << (column * (HEIGHT + 1) + (HEIGHT - 1))
    }

    pub fn bottom_mask(column: usize) -> u64 {
        1 << (column * (HEIGHT + 1))
    }

    pub fn column_mask(column: usize) -> u64 {
        ((1 << HEIGHT) - 1) << (column * (HEIGHT + 1))
    }

    pub fn playable(&self, column: usize) -> bool {
        Self::top_mask(column) & self.board_mask == 0
    }

    /// Playable columns in center-first order
    pub fn legal_moves(&self) -> impl Iterator<Item = usize> + '_ {
        move_order()
            .iter()
            .copied()
            .filter(move |&column| self.playable(column))
            .collect::<Vec<_>>()
            .into_iter()
    }

    pub fn is_full(&self) -> bool {
        self.num_moves == WIDTH * HEIGHT
    }

    /// The 0-based row the next tile in this column lands at
    pub fn height(&self, column: usize) -> usize {
        (self.board_mask & Self::column_mask(column)).count_ones() as usize
    }

    /// Drops a tile in the column for the side to move
    ///
    /// Returns `false` without touching the board when the column is full.
    pub fn make_move(&mut self, column: usize) -> bool {
        if !self.playable(column) {
            return false;
        }
        let move_bitmap = (self.board_mask + Self::bottom_mask(column)) & Self::column_mask(column);
        // switch the current player, then add a tile of the previous player
        self.player_mask ^= self.board_mask;
        self.board_mask |= move_bitmap;
        self.num_moves += 1;
        true
    }

    /// Removes the most recent tile from the column
    ///
    /// Moves must be undone in exact reverse order of application; the
    /// caller owns that discipline.
    pub fn undo_move(&mut self, column: usize) {
        let column_bits = self.board_mask & Self::column_mask(column);
        debug_assert!(column_bits != 0, "undo on an empty column");
        let top_bit = 1u64 << (63 - column_bits.leading_zeros());
        self.board_mask ^= top_bit;
        self.player_mask ^= self.board_mask;
        self.num_moves -= 1;
    }

    /// Tests whether the player has four tiles in a row
    pub fn check_win(&self, player: Player) -> bool {
        // with fewer than 7 tiles on the board no alignment of 4 exists yet
        if self.num_moves < 7 {
            return false;
        }
        let pos = self.piece_mask(player);

        // check diagonal alignment /
        let mut m = pos & (pos >> HEIGHT);
        if m & (m >> (2 * HEIGHT)) != 0 {
            return true;
        }

        // check diagonal alignment \
        m = pos & (pos >> (HEIGHT + 2));
        if m & (m >> (2 * (HEIGHT + 2))) != 0 {
            return true;
        }

        // check horizontal alignment
        m = pos & (pos >> (HEIGHT + 1));
        if m & (m >> (2 * (HEIGHT + 1))) != 0 {
            return true;
        }

        // check vertical alignment
        m = pos & (pos >> 1);
        m & (m >> 2) != 0
    }

    /// Bitmap of the cells a tile can land in on the next move
    pub fn playable_mask(&self) -> u64 {
        (self.board_mask + static_masks::bottom_mask()) & static_masks::full_board_mask()
    }

    /// Bitmap of open cells that would complete an alignment of 4 for the player
    pub fn winning_positions(&self, player: Player) -> u64 {
        let player_mask = self.piece_mask(player);

        // vertical
        // find the top ends of 3-alignments
        let mut r = (player_mask << 1) & (player_mask << 2) & (player_mask << 3);

        // horizontal
        let mut p = (player_mask << (HEIGHT + 1)) & (player_mask << (2 * (HEIGHT + 1)));
        // find the right ends of 3-alignments
        r |= p & (player_mask << (3 * (HEIGHT + 1)));
        // find holes of the type ...O O _ O...
        r |= p & (player_mask >> (HEIGHT + 1));

        p = (player_mask >> (HEIGHT + 1)) & (player_mask >> (2 * (HEIGHT + 1)));
        // find the left ends of 3-alignments
        r |= p & (player_mask >> (3 * (HEIGHT + 1)));
        // find holes of the type ...O _ O O...
        r |= p & (player_mask << (HEIGHT + 1));

        // diagonal /
        p = (player_mask << HEIGHT) & (player_mask << (2 * HEIGHT));
        r |= p & (player_mask << (3 * HEIGHT));
        r |= p & (player_mask >> HEIGHT);

        p = (player_mask >> HEIGHT) & (player_mask >> (2 * HEIGHT));
        r |= p & (player_mask >> (3 * HEIGHT));
        r |= p & (player_mask << HEIGHT);

        // diagonal \
        p = (player_mask << (HEIGHT + 2)) & (player_mask << (2 * (HEIGHT + 2)));
        r |= p & (player_mask << (3 * (HEIGHT + 2)));
        r |= p & (player_mask >> (HEIGHT + 2));

        p = (player_mask >> (HEIGHT + 2)) & (player_mask >> (2 * (HEIGHT + 2)));
        r |= p & (player_mask >> (3 * (HEIGHT + 2)));
        r |= p & (player_mask << (HEIGHT + 2));

        r & (static_masks::full_board_mask() ^ self.board_mask)
    }
}

impl Default for BitBoard {
    fn default() -> Self {
        Self::new()
    }
}

// debug rendering, rows top-to-bottom
impl fmt::Display for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let player_one = self.piece_mask(Player::One);
        let player_two = self.piece_mask(Player::Two);

        for row in (0..HEIGHT).rev() {
            write!(f, "|")?;
            for column in 0..WIDTH {
                let bit = 1u64 << (column * (HEIGHT + 1) + row);
                if player_one & bit != 0 {
                    write!(f, " X")?;
                } else if player_two & bit != 0 {
                    write!(f, " O")?;
                } else {
                    write!(f, " .")?;
                }
            }
            writeln!(f, " |")?;
        }
        writeln!(f, "|{}-|", "--".repeat(WIDTH))?;
        write!(f, " ")?;
        for column in 0..WIDTH {
            write!(f, " {}", column)?;
        }
        Ok(())
    }
}
