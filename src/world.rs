//! World-space coordinates shared with the animator and input layers.
//!
//! The board is centred on the origin with one world unit per cell, so cell
//! `(x, y)` has its centre at `(x + 0.5 - width/2, y + 0.5 - height/2)`.
use crate::engine::{BoardIndex, Direction};

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
}

impl WorldPoint {
    pub fn new(x: f32, y: f32) -> Self {
        WorldPoint { x, y }
    }

    pub fn distance(self, other: WorldPoint) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Converts between board indices and world positions for one board size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldGrid {
    width: usize,
    height: usize,
}

impl WorldGrid {
    pub fn new(width: usize, height: usize) -> Self {
        WorldGrid { width, height }
    }

    /// Centre of the cell at `index`. Works for off-board indices too, which is
    /// how spawn staging positions above the top row are computed.
    pub fn index_to_world(&self, index: BoardIndex) -> WorldPoint {
        WorldPoint::new(
            index.x as f32 + 0.5 - self.width as f32 / 2.0,
            index.y as f32 + 0.5 - self.height as f32 / 2.0,
        )
    }

    /// Inverse of `index_to_world` for cell centres.
    ///
    /// Floors after removing the half-cell offset, so it is exact on a centre but
    /// an arbitrary point maps to the cell below-left of it. Use `point_to_index`
    /// for pointer positions.
    pub fn world_to_index(&self, position: WorldPoint) -> BoardIndex {
        BoardIndex::new(
            (position.x - 0.5 + self.width as f32 / 2.0).floor() as i32,
            (position.y - 0.5 + self.height as f32 / 2.0).floor() as i32,
        )
    }

    /// The cell whose square contains `position`. Edges belong to the cell above
    /// and to the right.
    pub fn point_to_index(&self, position: WorldPoint) -> BoardIndex {
        BoardIndex::new(
            (position.x + self.width as f32 / 2.0).floor() as i32,
            (position.y + self.height as f32 / 2.0).floor() as i32,
        )
    }
}

/// Resolves a drag vector to a swap direction along its dominant axis.
///
/// Returns `None` when neither axis dominates (an exact diagonal, or no movement),
/// since the intended neighbour is ambiguous.
pub fn drag_direction(from: WorldPoint, to: WorldPoint) -> Option<Direction> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx.abs() < dy.abs() {
        Some(if dy < 0.0 { Direction::Down } else { Direction::Up })
    } else if dy.abs() < dx.abs() {
        Some(if dx < 0.0 { Direction::Left } else { Direction::Right })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_to_world_centres_board() {
        let grid = WorldGrid::new(4, 2);
        assert_eq!(grid.index_to_world(BoardIndex::new(0, 0)), WorldPoint::new(-1.5, -0.5));
        assert_eq!(grid.index_to_world(BoardIndex::new(3, 1)), WorldPoint::new(1.5, 0.5));
        // Staging row above the top.
        assert_eq!(grid.index_to_world(BoardIndex::new(0, 3)), WorldPoint::new(-1.5, 2.5));
    }

    #[test]
    fn test_world_to_index_inverts_centres() {
        let grid = WorldGrid::new(5, 7);
        for x in -1..6 {
            for y in -1..8 {
                let index = BoardIndex::new(x, y);
                assert_eq!(grid.world_to_index(grid.index_to_world(index)), index);
            }
        }
    }

    #[test]
    fn test_point_to_index_selects_cell_under_pointer() {
        let grid = WorldGrid::new(4, 2);
        let centre = grid.index_to_world(BoardIndex::new(2, 1));
        assert_eq!(centre, WorldPoint::new(0.5, 0.5));

        // Anywhere inside the square of (2, 1) resolves to it, not just the
        // upper-right quarter.
        for (dx, dy) in [(-0.2, -0.2), (0.2, -0.4), (-0.45, 0.3), (0.0, 0.0), (0.49, 0.49)] {
            let point = WorldPoint::new(centre.x + dx, centre.y + dy);
            assert_eq!(grid.point_to_index(point), BoardIndex::new(2, 1), "({}, {})", dx, dy);
        }
        assert_eq!(grid.point_to_index(WorldPoint::new(-0.1, 0.5)), BoardIndex::new(1, 1));
        assert_eq!(grid.point_to_index(WorldPoint::new(0.5, -0.1)), BoardIndex::new(2, 0));
        assert_eq!(grid.point_to_index(WorldPoint::new(-2.5, 0.0)), BoardIndex::new(-1, 1));
    }

    #[test]
    fn test_point_to_index_agrees_with_world_to_index_on_centres() {
        let grid = WorldGrid::new(5, 7);
        for index in [BoardIndex::new(0, 0), BoardIndex::new(4, 6), BoardIndex::new(2, 3)] {
            let centre = grid.index_to_world(index);
            assert_eq!(grid.point_to_index(centre), grid.world_to_index(centre));
        }
    }

    #[test]
    fn test_drag_direction_dominant_axis() {
        let origin = WorldPoint::new(0.0, 0.0);
        assert_eq!(drag_direction(origin, WorldPoint::new(0.2, 0.9)), Some(Direction::Up));
        assert_eq!(drag_direction(origin, WorldPoint::new(0.2, -0.9)), Some(Direction::Down));
        assert_eq!(drag_direction(origin, WorldPoint::new(0.9, 0.2)), Some(Direction::Right));
        assert_eq!(drag_direction(origin, WorldPoint::new(-0.9, -0.2)), Some(Direction::Left));
    }

    #[test]
    fn test_drag_direction_ties_select_nothing() {
        let origin = WorldPoint::new(1.0, 1.0);
        assert_eq!(drag_direction(origin, WorldPoint::new(1.5, 1.5)), None);
        assert_eq!(drag_direction(origin, WorldPoint::new(0.5, 1.5)), None);
        assert_eq!(drag_direction(origin, origin), None);
    }
}
