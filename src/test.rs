#[cfg(test)]
pub mod test {
    use anyhow::Result;
    use std::time::Duration;

    use crate::bitboard::{BitBoard, Player};
    use crate::book::{read_book, write_book};
    use crate::evaluator::{Evaluator, EvaluatorKind};
    use crate::search::MATE_SCORE;
    use crate::solver::Solver;
    use crate::transposition_table::{Bound, SeedEntry, TranspositionTable};
    use crate::zobrist::ZobristHasher;
    use crate::{HEIGHT, MAX_MOVES, WIDTH};

    fn cell(column: usize, row: usize) -> u64 {
        1 << (column * (HEIGHT + 1) + row)
    }

    #[test]
    pub fn make_undo_round_trip() {
        let moves = [3, 3, 2, 4, 4, 5, 0, 6, 3, 1];
        let mut board = BitBoard::new();
        let mut stack = Vec::new();

        for &column in &moves {
            stack.push((board.player_mask(), board.board_mask(), board.num_moves()));
            assert!(board.make_move(column));
        }
        for &column in moves.iter().rev() {
            board.undo_move(column);
            let (player_mask, board_mask, num_moves) = stack.pop().unwrap();
            assert_eq!(board.player_mask(), player_mask);
            assert_eq!(board.board_mask(), board_mask);
            assert_eq!(board.num_moves(), num_moves);
        }
    }

    #[test]
    pub fn incremental_hash_matches_full_recompute() {
        let hasher = ZobristHasher::default();
        let mut board = BitBoard::new();
        let mut hash = hasher.compute_hash(&board);

        for &column in &[3, 3, 2, 4, 0, 6, 5, 1, 3, 3] {
            hash = hasher.update_hash(hash, column, board.height(column), board.to_move());
            assert!(board.make_move(column));
            assert_eq!(hash, hasher.compute_hash(&board));
        }
    }

    #[test]
    pub fn hash_is_move_order_invariant() -> Result<()> {
        let hasher = ZobristHasher::default();

        let a = BitBoard::from_moves(&[2, 1, 3, 4])?;
        let b = BitBoard::from_moves(&[3, 4, 2, 1])?;
        assert_eq!(hasher.compute_hash(&a), hasher.compute_hash(&b));

        let a = BitBoard::from_moves(&[2, 2, 3, 3])?;
        let b = BitBoard::from_moves(&[3, 3, 2, 2])?;
        assert_eq!(hasher.compute_hash(&a), hasher.compute_hash(&b));

        // the same seed always generates the same constant table
        let other = ZobristHasher::new(crate::zobrist::DEFAULT_SEED);
        assert_eq!(other.compute_hash(&a), hasher.compute_hash(&a));
        Ok(())
    }

    #[test]
    pub fn win_detection_all_alignments() {
        let mut windows: Vec<[(usize, usize); 4]> = Vec::new();
        for row in 0..HEIGHT {
            for column in 0..WIDTH - 3 {
                windows.push([0, 1, 2, 3].map(|k| (column + k, row)));
            }
        }
        for column in 0..WIDTH {
            for row in 0..HEIGHT - 3 {
                windows.push([0, 1, 2, 3].map(|k| (column, row + k)));
            }
        }
        for column in 0..WIDTH - 3 {
            for row in 0..HEIGHT - 3 {
                windows.push([0, 1, 2, 3].map(|k| (column + k, row + k)));
            }
        }
        for column in 0..WIDTH - 3 {
            for row in 3..HEIGHT {
                windows.push([0, 1, 2, 3].map(|k| (column + k, row - k)));
            }
        }
        assert_eq!(windows.len(), 69);

        for window in &windows {
            let mask = window.iter().fold(0, |mask, &(c, r)| mask | cell(c, r));
            // even move count puts the tiles in player 1's hands
            let board = BitBoard::from_masks(mask, mask, 8);
            assert!(board.check_win(Player::One), "missed alignment {:?}", window);
            assert!(!board.check_win(Player::Two));

            // any three tiles of the four are not a win
            for &(c, r) in window {
                let broken = mask ^ cell(c, r);
                let board = BitBoard::from_masks(broken, broken, 8);
                assert!(
                    !board.check_win(Player::One),
                    "false alignment {:?} without {:?}",
                    window,
                    (c, r)
                );
            }
        }
    }

    #[test]
    pub fn horizontal_win_completes_on_final_tile() {
        let mut board = BitBoard::new();
        // player 1 builds row 0 across columns 2-5, player 2 stacks on top
        for &column in &[3, 3, 2, 2, 4, 4] {
            assert!(board.make_move(column));
            assert!(!board.check_win(Player::One));
            assert!(!board.check_win(Player::Two));
        }
        assert!(board.make_move(5));
        assert!(board.check_win(Player::One));
        assert!(!board.check_win(Player::Two));

        let dump = board.to_string();
        assert!(dump.contains("X X X X"));
        assert!(dump.contains(" 0 1 2 3 4 5 6"));
    }

    #[test]
    pub fn legal_moves_are_center_first() {
        let board = BitBoard::new();
        assert_eq!(board.legal_moves().collect::<Vec<_>>(), [3, 2, 4, 1, 5, 0, 6]);

        // fill column 3 completely
        let mut board = BitBoard::new();
        for _ in 0..HEIGHT {
            assert!(board.make_move(3));
        }
        assert!(!board.playable(3));
        assert!(!board.make_move(3));
        assert_eq!(board.legal_moves().collect::<Vec<_>>(), [2, 4, 1, 5, 0, 6]);
    }

    #[test]
    pub fn reconstruction_rejects_corrupt_move_lists() {
        assert!(BitBoard::from_moves(&[0, 7]).is_err());
        assert!(BitBoard::from_moves(&[1, 1, 1, 1, 1, 1, 1]).is_err());
        assert!(BitBoard::from_moves(&[3, 2, 3, 2]).is_ok());
    }

    #[test]
    pub fn replacement_prefers_deeper_results() {
        let mut table = TranspositionTable::new();
        table.store(42, 30, 12, Some(3), Bound::Exact);
        table.store(42, -5, 5, Some(1), Bound::Exact);
        assert_eq!(table.score(42), Some(30));
        assert_eq!(table.best_move(42), Some(3));

        // equal depth may replace
        table.store(42, 7, 12, Some(2), Bound::Exact);
        assert_eq!(table.score(42), Some(7));
        assert_eq!(table.best_move(42), Some(2));
    }

    #[test]
    pub fn probe_respects_depth_and_bounds() {
        let mut table = TranspositionTable::new();

        table.store(1, 50, 5, Some(3), Bound::Lower);
        // a lower bound at or above beta is a usable cutoff
        assert_eq!(table.probe(1, 5, -10, 40), Some((50, Some(3))));
        assert_eq!(table.probe(1, 5, -10, 60), None);
        // insufficient depth never cuts, but still orders moves
        assert_eq!(table.probe(1, 6, -10, 40), None);
        assert_eq!(table.best_move(1), Some(3));

        table.store(2, -20, 5, None, Bound::Upper);
        assert_eq!(table.probe(2, 5, -10, 10), Some((-20, None)));
        assert_eq!(table.probe(2, 5, -30, 10), None);

        table.store(3, 0, 5, Some(0), Bound::Exact);
        assert_eq!(table.probe(3, 5, -100, 100), Some((0, Some(0))));
    }

    #[test]
    pub fn seed_survives_clear() {
        let seed = vec![SeedEntry {
            hash: 99,
            score: 10,
            depth: 42,
            best_move: 3,
        }];
        let mut table = TranspositionTable::with_seed(seed);
        table.store(7, 1, 3, Some(0), Bound::Exact);
        assert_eq!(table.len(), 2);

        table.clear();
        assert_eq!(table.len(), 1);
        assert_eq!(table.score(99), Some(10));
        assert_eq!(table.best_move(99), Some(3));
        assert_eq!(table.score(7), None);
    }

    #[test]
    pub fn depth_four_search_prefers_center() {
        for &kind in &[EvaluatorKind::Threats, EvaluatorKind::Positional] {
            let mut solver = Solver::new(BitBoard::new()).with_evaluator(kind);
            let (_, column) = solver.search_to_depth(4).unwrap();
            assert_eq!(column, 3, "evaluator {:?}", kind);
        }
    }

    #[test]
    pub fn mate_in_one_is_found() -> Result<()> {
        for &kind in &[EvaluatorKind::Threats, EvaluatorKind::Positional] {
            // player 1 to move with three tiles stacked in the center
            let mut solver = Solver::from_moves(&[3, 0, 3, 0, 3, 0])?.with_evaluator(kind);
            let (score, column) = solver.search_to_depth(6).unwrap();
            assert_eq!(score, MATE_SCORE - 1, "evaluator {:?}", kind);
            assert_eq!(column, 3, "evaluator {:?}", kind);
        }
        Ok(())
    }

    #[test]
    pub fn compute_move_takes_a_forced_win() -> Result<()> {
        let mut solver = Solver::from_moves(&[3, 0, 3, 0, 3, 0])?;
        assert_eq!(solver.compute_move(Duration::from_secs(1)), Some(3));
        Ok(())
    }

    #[test]
    pub fn tiny_budget_still_returns_a_legal_move() {
        let mut solver = Solver::new(BitBoard::new());
        assert_eq!(solver.compute_move(Duration::from_nanos(1)), Some(3));
    }

    #[test]
    pub fn full_board_has_no_move() {
        let full = (0..WIDTH).fold(0, |mask, column| mask | BitBoard::column_mask(column));
        let mut solver = Solver::new(BitBoard::from_masks(0, full, MAX_MOVES));
        assert_eq!(solver.compute_move(Duration::from_millis(10)), None);
    }

    #[test]
    pub fn evaluation_is_idempotent() -> Result<()> {
        let board = BitBoard::from_moves(&[3, 2, 3, 4, 0])?;
        for &kind in &[EvaluatorKind::Threats, EvaluatorKind::Positional] {
            let evaluator = Evaluator::new(kind);
            assert_eq!(evaluator.evaluate(&board), evaluator.evaluate(&board));
        }
        Ok(())
    }

    #[test]
    pub fn book_records_round_trip() -> Result<()> {
        let entries = vec![
            SeedEntry {
                hash: 0xdead_beef_0123_4567,
                score: -3,
                depth: 42,
                best_move: 3,
            },
            SeedEntry {
                hash: 7,
                score: MATE_SCORE - 5,
                depth: 10,
                best_move: 0,
            },
        ];
        let mut buffer = Vec::new();
        write_book(&mut buffer, &entries)?;
        assert_eq!(read_book(&mut buffer.as_slice())?, entries);

        // a record cut short is a hard error, not a silent drop
        let mut truncated = &buffer[..buffer.len() - 1];
        assert!(read_book(&mut truncated).is_err());

        // as is a column outside the board
        let mut bad = Vec::new();
        write_book(
            &mut bad,
            &[SeedEntry {
                hash: 1,
                score: 0,
                depth: 1,
                best_move: 3,
            }],
        )?;
        bad[12] = WIDTH as u8;
        assert!(read_book(&mut bad.as_slice()).is_err());
        Ok(())
    }

    #[test]
    pub fn seeded_move_survives_table_reuse() -> Result<()> {
        // seed the root position of a small game with a fixed reply and
        // check the entry is still probed after the per-move clear
        let hasher = ZobristHasher::default();
        let board = BitBoard::from_moves(&[3, 0, 3, 0, 3, 0])?;
        let seed = vec![SeedEntry {
            hash: hasher.compute_hash(&board),
            score: MATE_SCORE - 1,
            depth: MAX_MOVES as u8,
            best_move: 3,
        }];

        let mut solver = Solver::from_moves(&[3, 0, 3, 0, 3, 0])?.with_seed(seed);
        assert_eq!(solver.compute_move(Duration::from_secs(1)), Some(3));
        assert_eq!(solver.compute_move(Duration::from_secs(1)), Some(3));
        Ok(())
    }
}
