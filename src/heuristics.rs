use crate::engine::{Board, BoardIndex, Direction};
use crate::matching::MatchDetector;

/// A suggested player swap and what it would clear immediately.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapHint {
    pub from: BoardIndex,
    pub direction: Direction,
    /// Tiles the first clear cycle would remove, before any cascade.
    pub immediate_clear: usize,
}

/// Chooses a swap based on the Maximize Immediate Clear (MIC) strategy.
///
/// Every legal swap is simulated on a scratch board and the one removing the most
/// tiles in its first clear cycle wins. Cascades are not simulated since spawned
/// colors are unknown. Ties go to the first candidate in board scan order, so the
/// result is deterministic for a given board.
///
/// # Returns
/// `None` when the board has no legal swap (it is deadlocked).
pub fn suggest_swap(board: &Board, detector: &MatchDetector) -> Option<SwapHint> {
    let mut scratch = board.clone();
    let mut best: Option<SwapHint> = None;

    for from in detector.list_legal_moves(board) {
        for direction in Direction::ALL {
            let to = from.neighbor(direction);
            if !scratch.swap_cells(from, to) {
                continue;
            }
            let cleared = detector.find_all_clearable(&scratch).len();
            scratch.swap_cells(from, to);

            if cleared == 0 {
                continue;
            }
            if best.map_or(true, |b| cleared > b.immediate_clear) {
                best = Some(SwapHint {
                    from,
                    direction,
                    immediate_clear: cleared,
                });
            }
        }
    }
    best
}

/// Number of distinct cells that have at least one clearing swap.
///
/// A cheap measure of how open the board is; 0 means deadlock.
pub fn count_movable_tiles(board: &Board, detector: &MatchDetector) -> usize {
    detector.list_legal_moves(board).len()
}
