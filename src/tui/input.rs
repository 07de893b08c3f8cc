//! Keyboard and mouse mapping onto board cells.

use crossterm::event::KeyCode;
use ratatui::layout::{Position, Rect};

/// Moves a 0-based cursor with the arrow keys. Edges don't wrap.
pub fn move_cursor(cursor: usize, key: KeyCode) -> usize {
    let (row, col) = (cursor / 3, cursor % 3);

    match key {
        KeyCode::Right if col < 2 => cursor + 1,
        KeyCode::Left if col > 0 => cursor - 1,
        KeyCode::Down if row < 2 => cursor + 3,
        KeyCode::Up if row > 0 => cursor - 3,
        _ => cursor,
    }
}

/// Maps a digit key `1`-`9` to a 0-based cell index.
pub fn digit_cell(key: KeyCode) -> Option<usize> {
    match key {
        KeyCode::Char(c @ '1'..='9') => c.to_digit(10).map(|d| d as usize - 1),
        _ => None,
    }
}

/// Finds the cell whose last drawn area contains the given terminal position.
pub fn hit_cell(cell_areas: &[Rect], column: u16, row: u16) -> Option<usize> {
    cell_areas
        .iter()
        .position(|area| area.contains(Position::new(column, row)))
}
