//! Run detection and move feasibility.
//!
//! A run is a contiguous line of same-colored tiles along one axis. Runs of at
//! least `match_color_count` tiles are cleared. The detector scans from every
//! occupied cell rather than from run starts: redundant, but it cannot miss a run
//! regardless of where it begins.
use crate::engine::{Axis, Board, BoardIndex, Direction};
use std::collections::BTreeSet;

/// Finds clearable runs and legal swaps for one fixed match length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchDetector {
    match_color_count: usize,
}

impl MatchDetector {
    pub fn new(match_color_count: usize) -> Self {
        MatchDetector { match_color_count }
    }

    pub fn match_color_count(&self) -> usize {
        self.match_color_count
    }

    /// Collects the run through `origin` along `axis`.
    ///
    /// Walks outward in both directions of the axis while cells are in range,
    /// occupied, and share `origin`'s color. The result always contains `origin`
    /// when it is occupied; an empty or off-board origin yields an empty set.
    pub fn find_run(&self, board: &Board, origin: BoardIndex, axis: Axis) -> BTreeSet<BoardIndex> {
        let mut run = BTreeSet::new();
        let color = match board.get(origin) {
            Some(tile) => tile.color(),
            None => return run,
        };
        run.insert(origin);

        for direction in axis.directions() {
            let mut check = origin.neighbor(direction);
            while !run.contains(&check) {
                match board.get(check) {
                    Some(tile) if tile.color() == color => {
                        run.insert(check);
                        check = check.neighbor(direction);
                    }
                    _ => break,
                }
            }
        }
        run
    }

    /// True if a run is long enough to clear.
    pub fn qualifies(&self, run: &BTreeSet<BoardIndex>) -> bool {
        run.len() >= self.match_color_count
    }

    /// Union of every qualifying horizontal and vertical run on the board.
    ///
    /// A cell in both a horizontal and a vertical qualifying run contributes both.
    pub fn find_all_clearable(&self, board: &Board) -> BTreeSet<BoardIndex> {
        let mut clearable = BTreeSet::new();
        for (index, _) in board.occupied() {
            for axis in Axis::ALL {
                let run = self.find_run(board, index, axis);
                if self.qualifies(&run) {
                    clearable.extend(run);
                }
            }
        }
        clearable
    }

    /// Every occupied index that has at least one neighbour swap producing a clear.
    ///
    /// Each candidate swap is applied to a scratch copy of the board and always
    /// undone, so `board` is never observed mid-swap. Swaps `Board::swap_cells`
    /// refuses (off-board neighbours) are not moves.
    pub fn list_legal_moves(&self, board: &Board) -> BTreeSet<BoardIndex> {
        let mut scratch = board.clone();
        let mut movable = BTreeSet::new();

        for (index, _) in board.occupied() {
            for direction in Direction::ALL {
                let target = index.neighbor(direction);
                if !scratch.swap_cells(index, target) {
                    continue;
                }
                if !self.find_all_clearable(&scratch).is_empty() {
                    movable.insert(index);
                }
                scratch.swap_cells(index, target);
            }
        }
        movable
    }

    /// False exactly when `list_legal_moves` is empty: the board is deadlocked.
    pub fn has_any_legal_move(&self, board: &Board) -> bool {
        let mut scratch = board.clone();
        board.occupied().any(|(index, _)| {
            Direction::ALL.iter().any(|&direction| {
                let target = index.neighbor(direction);
                if !scratch.swap_cells(index, target) {
                    return false;
                }
                let clears = !self.find_all_clearable(&scratch).is_empty();
                scratch.swap_cells(index, target);
                clears
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::board_from_str_array;

    fn idx(x: i32, y: i32) -> BoardIndex {
        BoardIndex::new(x, y)
    }

    fn set_of(indices: &[(i32, i32)]) -> BTreeSet<BoardIndex> {
        indices.iter().map(|&(x, y)| idx(x, y)).collect()
    }

    #[test]
    fn test_find_run_horizontal_stops_at_mismatch_and_gap() {
        let board = board_from_str_array(&["AAA.AB"]).unwrap();
        let detector = MatchDetector::new(3);

        let run = detector.find_run(&board, idx(1, 0), Axis::Horizontal);
        assert_eq!(run, set_of(&[(0, 0), (1, 0), (2, 0)]));

        let lone = detector.find_run(&board, idx(4, 0), Axis::Horizontal);
        assert_eq!(lone, set_of(&[(4, 0)]));
    }

    #[test]
    fn test_find_run_vertical_and_empty_origin() {
        let board = board_from_str_array(&["A.", "A.", "AB"]).unwrap();
        let detector = MatchDetector::new(3);

        assert_eq!(
            detector.find_run(&board, idx(0, 0), Axis::Vertical),
            set_of(&[(0, 0), (0, 1), (0, 2)])
        );
        assert_eq!(
            detector.find_run(&board, idx(0, 1), Axis::Horizontal),
            set_of(&[(0, 1)])
        );
        assert!(detector.find_run(&board, idx(1, 2), Axis::Vertical).is_empty());
        assert!(detector.find_run(&board, idx(-1, 0), Axis::Vertical).is_empty());
    }

    #[test]
    fn test_find_all_clearable_row_scenario() {
        let board = board_from_str_array(&[
            ".....",
            ".....",
            ".....",
            ".....",
            "AAABC",
        ])
        .unwrap();
        let detector = MatchDetector::new(3);
        assert_eq!(
            detector.find_all_clearable(&board),
            set_of(&[(0, 0), (1, 0), (2, 0)])
        );
    }

    #[test]
    fn test_find_all_clearable_unions_crossing_runs() {
        // An L-shape: a vertical run of A in column 0 and a horizontal run along the bottom.
        let board = board_from_str_array(&["A..", "A..", "AAA", "BCB"]).unwrap();
        let detector = MatchDetector::new(3);
        assert_eq!(
            detector.find_all_clearable(&board),
            set_of(&[(0, 1), (0, 2), (0, 3), (1, 1), (2, 1)])
        );
    }

    #[test]
    fn test_find_all_clearable_respects_threshold() {
        let board = board_from_str_array(&["AAAAB", "BBCCA"]).unwrap();
        assert_eq!(MatchDetector::new(5).find_all_clearable(&board), BTreeSet::new());
        assert_eq!(
            MatchDetector::new(4).find_all_clearable(&board),
            set_of(&[(0, 1), (1, 1), (2, 1), (3, 1)])
        );
        assert_eq!(MatchDetector::new(2).find_all_clearable(&board).len(), 8);
    }

    #[test]
    fn test_find_all_clearable_never_returns_short_runs() {
        for seed in 0..40 {
            let board = Board::new_random_with_seed(7, 6, 4, seed);
            let detector = MatchDetector::new(3);
            for index in detector.find_all_clearable(&board) {
                let longest = Axis::ALL
                    .iter()
                    .map(|&axis| detector.find_run(&board, index, axis).len())
                    .max()
                    .unwrap_or(0);
                assert!(
                    longest >= 3,
                    "seed {}: {} is marked clearable with longest run {}",
                    seed,
                    index,
                    longest
                );
            }
        }
    }

    #[test]
    fn test_list_legal_moves_finds_setup_swap() {
        // Moving the lone A at (2, 1) down completes the bottom row.
        let board = board_from_str_array(&["BCAB", "AABC"]).unwrap();
        let detector = MatchDetector::new(3);
        assert!(detector.find_all_clearable(&board).is_empty());

        let moves = detector.list_legal_moves(&board);
        assert!(moves.contains(&idx(2, 1)));
        assert!(moves.contains(&idx(2, 0)));
        assert!(detector.has_any_legal_move(&board));
    }

    #[test]
    fn test_legal_move_check_leaves_board_untouched() {
        let board = Board::new_random_with_seed(5, 5, 4, 99);
        let snapshot = board.clone();
        let detector = MatchDetector::new(3);
        let _ = detector.list_legal_moves(&board);
        let _ = detector.has_any_legal_move(&board);
        assert_eq!(board, snapshot);
    }

    #[test]
    fn test_deadlocked_three_color_board() {
        let board = board_from_str_array(&["CABCA", "ABCAB", "BCABC", "CABCA", "ABCAB"]).unwrap();
        let detector = MatchDetector::new(3);
        assert!(detector.find_all_clearable(&board).is_empty());
        assert!(detector.list_legal_moves(&board).is_empty());
        assert!(!detector.has_any_legal_move(&board));
    }

    #[test]
    fn test_checkerboard_deadlocks_only_for_long_matches() {
        let board = board_from_str_array(&["ABABA", "BABAB", "ABABA", "BABAB", "ABABA"]).unwrap();
        // Any swap lines up three in a column, so 3-match still has moves.
        assert!(MatchDetector::new(3).has_any_legal_move(&board));
        assert!(!MatchDetector::new(4).has_any_legal_move(&board));
    }

    #[test]
    fn test_has_any_legal_move_agrees_with_list() {
        let detector = MatchDetector::new(3);
        for seed in 0..30 {
            let board = Board::new_random_with_seed(4, 4, 5, seed);
            assert_eq!(
                detector.has_any_legal_move(&board),
                !detector.list_legal_moves(&board).is_empty(),
                "seed {}",
                seed
            );
        }
    }
}
