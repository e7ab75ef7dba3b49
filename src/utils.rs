use crate::engine::{Board, BoardIndex, Tile, TileId};
use crate::error::ParseBoardError;

/// Parses an array of string slices into a `Board` object.
///
/// Each string slice is one row, listed TOP row first, so the text reads the way
/// the board looks on screen. The board is `row_len x rows.len()`; every row must
/// have the same length.
///
/// Valid characters are:
/// - `'A'..='Z'`: a tile of color `0..=25`
/// - `'.'`: an empty cell
///
/// Tile ids are assigned in reading order, starting at 0.
///
/// # Examples
/// ```
/// use match3_engine::utils::board_from_str_array;
/// use match3_engine::engine::BoardIndex;
///
/// let board = board_from_str_array(&["AB.", "CAB"]).unwrap();
/// assert_eq!(board.width(), 3);
/// assert_eq!(board.height(), 2);
/// assert_eq!(board.get(BoardIndex::new(0, 1)).map(|t| t.color()), Some(0)); // top-left
/// assert_eq!(board.get(BoardIndex::new(2, 1)), None);
///
/// assert!(board_from_str_array(&["A1B"]).is_err());
/// assert!(board_from_str_array(&["AB", "A"]).is_err());
/// ```
pub fn board_from_str_array(rows: &[&str]) -> Result<Board, ParseBoardError> {
    let height = rows.len();
    let width = match rows.first() {
        Some(first) => first.chars().count(),
        None => return Err(ParseBoardError::NoRows),
    };

    let mut board = Board::new_empty(width, height);
    let mut next_id = 0u64;

    for (r, row_str) in rows.iter().enumerate() {
        let found = row_str.chars().count();
        if found != width {
            return Err(ParseBoardError::RaggedRow {
                row: r,
                expected: width,
                found,
            });
        }

        let y = (height - 1 - r) as i32;
        for (c, ch) in row_str.chars().enumerate() {
            let tile = match ch {
                '.' => None,
                'A'..='Z' => {
                    let tile = Tile::new(TileId(next_id), ch as u8 - b'A');
                    next_id += 1;
                    Some(tile)
                }
                _ => {
                    return Err(ParseBoardError::UnrecognizedChar { ch, row: r, col: c });
                }
            };
            board.set(BoardIndex::new(c as i32, y), tile);
        }
    }
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_from_str_array_valid() {
        let board = board_from_str_array(&["ABCDE", ".....", "EDCBA"]).unwrap();
        assert_eq!(board.width(), 5);
        assert_eq!(board.height(), 3);
        assert_eq!(board.get(BoardIndex::new(0, 2)).map(|t| t.color()), Some(0));
        assert_eq!(board.get(BoardIndex::new(4, 0)).map(|t| t.color()), Some(0));
        assert_eq!(board.get(BoardIndex::new(2, 1)), None);
        assert_eq!(board.tile_count(), 10);
    }

    #[test]
    fn test_board_from_str_array_assigns_unique_ids() {
        let board = board_from_str_array(&["AA", "AA"]).unwrap();
        let mut ids: Vec<TileId> = board.occupied().map(|(_, t)| t.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_board_from_str_array_invalid_char() {
        let result = board_from_str_array(&["ABX", "Ab."]);
        assert_eq!(
            result.unwrap_err(),
            ParseBoardError::UnrecognizedChar {
                ch: 'b',
                row: 1,
                col: 1
            }
        );
    }

    #[test]
    fn test_board_from_str_array_with_spaces() {
        let result = board_from_str_array(&["A B"]);
        assert!(result.unwrap_err().to_string().contains("unrecognized character ' '"));
    }

    #[test]
    fn test_board_from_str_array_ragged_row() {
        let result = board_from_str_array(&["AAA", "AAAA"]);
        assert_eq!(
            result.unwrap_err(),
            ParseBoardError::RaggedRow {
                row: 1,
                expected: 3,
                found: 4
            }
        );
    }

    #[test]
    fn test_board_from_str_array_empty_input() {
        let rows: [&str; 0] = [];
        assert_eq!(board_from_str_array(&rows).unwrap_err(), ParseBoardError::NoRows);
    }
}
