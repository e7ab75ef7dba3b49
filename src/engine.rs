//! Core board model for the match-3 rules engine.
//!
//! This module defines the data the rest of the crate works on:
//! - `Tile`: an opaque identifier plus a color drawn from `[0, color_count)`.
//! - `BoardIndex`, `Direction`, `Axis`: signed cell coordinates and the four
//!   axis-aligned neighbours. Indices may point off the board; every query treats
//!   those as absent rather than failing.
//! - `Board`: the fixed-size grid of optional tiles with get/set/swap.
//!
//! Row `y = 0` is the bottom of the board. Gravity pulls toward lower `y` and new
//! tiles enter from above `height - 1`.
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Identity of a tile. Unique within one session; irrelevant to matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u64);

/// A colored tile occupying one board cell.
///
/// Position is not part of the tile: the cell that holds it is authoritative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    id: TileId,
    color: u8,
}

impl Tile {
    pub fn new(id: TileId, color: u8) -> Self {
        Tile { id, color }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn color(&self) -> u8 {
        self.color
    }

    /// Converts the tile color to its fixture letter (`0 -> 'A'`, `1 -> 'B'`, ...).
    ///
    /// # Examples
    ///
    /// ```
    /// use match3_engine::engine::{Tile, TileId};
    /// assert_eq!(Tile::new(TileId(0), 0).to_char(), 'A');
    /// assert_eq!(Tile::new(TileId(1), 4).to_char(), 'E');
    /// ```
    pub fn to_char(&self) -> char {
        if self.color < 26 {
            (b'A' + self.color) as char
        } else {
            '?'
        }
    }

    /// Returns the ANSI background color code string for terminal output.
    fn to_ansi_color_code(&self) -> &'static str {
        match self.color % 6 {
            0 => "41",
            1 => "42",
            2 => "43",
            3 => "44",
            4 => "45",
            _ => "46",
        }
    }
}

/// The four axis-aligned neighbour directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// `(dx, dy)` step for this direction. Up is toward higher `y`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
        }
    }
}

/// A pair of opposite directions along which runs are measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    pub fn directions(self) -> [Direction; 2] {
        match self {
            Axis::Horizontal => [Direction::Left, Direction::Right],
            Axis::Vertical => [Direction::Up, Direction::Down],
        }
    }
}

/// A cell coordinate. Signed so that off-board neighbours and the spawn staging
/// rows above the grid can be expressed.
///
/// Ordering is column-major (`x`, then `y`), which is also the order
/// `Board::indices` walks the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoardIndex {
    pub x: i32,
    pub y: i32,
}

impl BoardIndex {
    pub fn new(x: i32, y: i32) -> Self {
        BoardIndex { x, y }
    }

    pub fn neighbor(self, direction: Direction) -> BoardIndex {
        self.offset(direction.delta())
    }

    pub fn offset(self, (dx, dy): (i32, i32)) -> BoardIndex {
        BoardIndex::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for BoardIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The game board: a `width x height` grid where each cell is empty or holds a `Tile`.
///
/// The grid never resizes after creation. Cells are stored column by column so a
/// column is contiguous in memory, which is how gravity walks it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Option<Tile>>,
}

impl Board {
    /// Creates a board with every cell empty.
    ///
    /// # Examples
    /// ```
    /// use match3_engine::engine::{Board, BoardIndex};
    /// let board = Board::new_empty(5, 4);
    /// assert_eq!(board.get(BoardIndex::new(0, 0)), None);
    /// assert_eq!(board.tile_count(), 0);
    /// ```
    pub fn new_empty(width: usize, height: usize) -> Self {
        Board {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Creates a fully occupied board with colors drawn from `[0, color_count)`.
    ///
    /// The same seed always produces the same board. Tile ids are assigned
    /// `0..width*height` in column-major order.
    pub fn new_random_with_seed(width: usize, height: usize, color_count: u8, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut board = Board::new_empty(width, height);
        let colors = color_count.max(1);
        for (n, slot) in board.cells.iter_mut().enumerate() {
            *slot = Some(Tile::new(TileId(n as u64), rng.gen_range(0..colors)));
        }
        board
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// True iff `index` lies outside `[0, width) x [0, height)`.
    pub fn is_out_of_range(&self, index: BoardIndex) -> bool {
        index.x < 0
            || index.y < 0
            || index.x as usize >= self.width
            || index.y as usize >= self.height
    }

    fn slot(&self, index: BoardIndex) -> Option<usize> {
        if self.is_out_of_range(index) {
            None
        } else {
            Some(index.x as usize * self.height + index.y as usize)
        }
    }

    /// Returns the tile at `index`, or `None` for empty and out-of-range cells.
    pub fn get(&self, index: BoardIndex) -> Option<Tile> {
        self.slot(index).and_then(|s| self.cells[s])
    }

    /// Overwrites the cell at `index`. Out-of-range writes are ignored.
    ///
    /// No aliasing check is made: the caller must not place the same tile in two cells.
    pub fn set(&mut self, index: BoardIndex, tile: Option<Tile>) {
        if let Some(s) = self.slot(index) {
            self.cells[s] = tile;
        }
    }

    /// Empties the cell at `index` and returns what it held.
    pub fn take(&mut self, index: BoardIndex) -> Option<Tile> {
        self.slot(index).and_then(|s| self.cells[s].take())
    }

    /// Exchanges the contents of two cells.
    ///
    /// Returns `false` without touching the board if either index is out of range
    /// or `a == b`. Either cell may be empty.
    pub fn swap_cells(&mut self, a: BoardIndex, b: BoardIndex) -> bool {
        if a == b {
            return false;
        }
        match (self.slot(a), self.slot(b)) {
            (Some(sa), Some(sb)) => {
                self.cells.swap(sa, sb);
                true
            }
            _ => false,
        }
    }

    /// Every in-range index, column by column from the bottom up.
    pub fn indices(&self) -> impl Iterator<Item = BoardIndex> {
        let height = self.height as i32;
        (0..self.width as i32).flat_map(move |x| (0..height).map(move |y| BoardIndex::new(x, y)))
    }

    /// Every occupied cell with its tile, in `indices` order.
    pub fn occupied(&self) -> impl Iterator<Item = (BoardIndex, Tile)> + '_ {
        self.indices()
            .filter_map(move |index| self.get(index).map(|tile| (index, tile)))
    }

    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Generates a terminal rendering with ANSI colors, top row first, with an
    /// optional highlighted cell marked `*`. Each tile shows its letter on its
    /// color; empty cells show `.`. Column and row numbers frame the grid.
    pub fn to_string_with_highlight(&self, highlight: Option<BoardIndex>) -> String {
        let mut output = String::new();

        output.push_str("   ");
        for x in 0..self.width {
            output.push_str(&format!("{:<2}", x));
        }
        output.push('\n');

        for y in (0..self.height as i32).rev() {
            output.push_str(&format!("{:<3}", y));
            for x in 0..self.width as i32 {
                let index = BoardIndex::new(x, y);
                let marker = if highlight == Some(index) { '*' } else { ' ' };
                match self.get(index) {
                    // The letter keeps colors apart once the palette wraps.
                    Some(tile) => output.push_str(&format!(
                        "\x1b[1;{};m{}{}\x1b[m",
                        tile.to_ansi_color_code(),
                        tile.to_char(),
                        marker
                    )),
                    None => {
                        output.push('.');
                        output.push(marker);
                    }
                }
            }
            if y > 0 {
                output.push('\n');
            }
        }

        output
    }
}

impl fmt::Display for Board {
    /// Plain text rendering, top row first: a letter per color, `.` for empty.
    /// This is the format `utils::board_from_str_array` reads.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height as i32).rev() {
            for x in 0..self.width as i32 {
                let ch = self
                    .get(BoardIndex::new(x, y))
                    .map_or('.', |tile| tile.to_char());
                write!(f, "{}", ch)?;
            }
            if y > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
