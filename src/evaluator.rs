//! Static heuristic scoring of non-terminal positions
//!
//! Scores are from player 1's perspective; the search negates for player 2.
//! The caller checks for wins separately, so no variant needs a terminal
//! branch, and every score stays strictly below the search's mate range.

use crate::bitboard::{BitBoard, Player};

/// Largest magnitude a heuristic score can take
///
/// Must stay well below [`crate::search::MATE_SCORE`] minus the maximum
/// search ply so a heuristic value can never be mistaken for a forced win.
pub const HEURISTIC_MAX: i32 = 50_000;

// weight of an open cell completing an alignment of 4
const OPEN_COMPLETION: i32 = 250;
// extra weight when that cell is playable on the very next move
const PLAYABLE_COMPLETION: i32 = 2_000;
// weight per tile in the three middle columns
const CENTER_TILE: i32 = 30;

/// The closed set of heuristic variants
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum EvaluatorKind {
    /// Count open completion cells for each player
    Threats,
    /// Threat counting weighted by immediate playability, plus center control
    Positional,
}

/// Pluggable position evaluator, selected at construction
#[derive(Copy, Clone, Debug)]
pub struct Evaluator {
    kind: EvaluatorKind,
}

impl Evaluator {
    pub fn new(kind: EvaluatorKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> EvaluatorKind {
        self.kind
    }

    /// Scores the position; positive favours player 1
    pub fn evaluate(&self, board: &BitBoard) -> i32 {
        let score = match self.kind {
            EvaluatorKind::Threats => threat_score(board),
            EvaluatorKind::Positional => positional_score(board),
        };
        score.max(-HEURISTIC_MAX).min(HEURISTIC_MAX)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(EvaluatorKind::Threats)
    }
}

fn threat_score(board: &BitBoard) -> i32 {
    let player_one = board.winning_positions(Player::One).count_ones() as i32;
    let player_two = board.winning_positions(Player::Two).count_ones() as i32;
    (player_one - player_two) * OPEN_COMPLETION
}

fn positional_score(board: &BitBoard) -> i32 {
    let playable = board.playable_mask();
    let center = center_mask();

    let mut score = 0;
    for &(player, sign) in &[(Player::One, 1), (Player::Two, -1)] {
        let completions = board.winning_positions(player);
        let immediate = (completions & playable).count_ones() as i32;
        let open = completions.count_ones() as i32;
        let center_tiles = (board.piece_mask(player) & center).count_ones() as i32;

        score += sign * (immediate * PLAYABLE_COMPLETION + open * OPEN_COMPLETION + center_tiles * CENTER_TILE);
    }
    score
}

fn center_mask() -> u64 {
    BitBoard::column_mask(2) | BitBoard::column_mask(3) | BitBoard::column_mask(4)
}
