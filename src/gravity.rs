//! Gravity: relocating tiles down into empty cells after a clear.
//!
//! Only the data layer moves here. Each relocation is reported as a `Fall` so the
//! caller can hand the destination to the animator.
use crate::engine::{Board, BoardIndex, TileId};

/// One tile relocated by `Board::fall_all`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fall {
    pub tile: TileId,
    pub from: BoardIndex,
    pub to: BoardIndex,
}

impl Board {
    /// Lowest empty row strictly below `above_y` in column `x`.
    ///
    /// Scans from `above_y - 1` down to row 0 and keeps the lowest empty row seen,
    /// so the answer is the lowest gap, not the nearest. Returns `None` when no
    /// row below is empty or the column is off the board.
    pub fn lowest_empty_row(&self, x: i32, above_y: i32) -> Option<i32> {
        let mut bottom = None;
        for check_y in (0..above_y).rev() {
            let index = BoardIndex::new(x, check_y);
            if self.is_out_of_range(index) {
                continue;
            }
            if self.get(index).is_none() {
                bottom = Some(check_y);
            }
        }
        bottom
    }

    /// Drops every tile to the lowest empty row beneath it.
    ///
    /// Columns are processed bottom-up, so lower tiles settle before the tiles
    /// above them look for a gap and a single pass packs each column with no
    /// internal holes. Relative order within a column is preserved.
    pub fn fall_all(&mut self) -> Vec<Fall> {
        let mut falls = Vec::new();
        let indices: Vec<BoardIndex> = self.indices().collect();
        for from in indices {
            let tile = match self.get(from) {
                Some(tile) => tile,
                None => continue,
            };
            let Some(bottom_y) = self.lowest_empty_row(from.x, from.y) else {
                continue;
            };
            let to = BoardIndex::new(from.x, bottom_y);
            if self.swap_cells(from, to) {
                falls.push(Fall {
                    tile: tile.id(),
                    from,
                    to,
                });
            }
        }
        falls
    }
}
