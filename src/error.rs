//! Error types for session construction and board fixtures.
//!
//! Routine absence (an index off the board, an empty cell) is never an error in
//! this crate; it is modelled with `Option`. The types here cover the only
//! conditions that reject input outright.

use thiserror::Error;

/// A session configuration that cannot produce a playable board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Width or height is zero.
    #[error("board dimensions must be positive, got {width}x{height}")]
    EmptyBoard { width: usize, height: usize },

    /// Runs shorter than two tiles would clear every tile on the board.
    #[error("match_color_count must be at least 2, got {0}")]
    MatchCountTooSmall(usize),

    /// Spawning needs at least one color to draw from.
    #[error("color_count must be at least 1, got {0}")]
    NoColors(u8),

    /// Colors past the letter range cannot be shown or written as text boards.
    #[error("color_count must be at most {max}, got {found}")]
    TooManyColors { found: u8, max: u8 },

    /// A board handed to the session disagrees with the configured size.
    #[error(
        "board is {actual_width}x{actual_height} but the configuration expects {width}x{height}"
    )]
    BoardMismatch {
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    /// A board handed to the session holds a color spawning would never produce.
    #[error("tile at ({x}, {y}) has color {color}, but color_count is {color_count}")]
    ColorOutOfRange {
        x: i32,
        y: i32,
        color: u8,
        color_count: u8,
    },
}

/// Failure to parse a text board fixture.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseBoardError {
    #[error("board has no rows")]
    NoRows,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unrecognized character '{ch}' in row {row} col {col}")]
    UnrecognizedChar { ch: char, row: usize, col: usize },
}
