//! Game board: settled cells, collision queries, line clearing

use crate::tetromino::PieceType;
use std::collections::HashSet;

/// Standard board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// The settled-cell grid
///
/// Stored as `[row][col]` with row 0 at the top and rows increasing downward.
/// A cell holds 0 when empty or `identity + 1` for the piece that locked
/// there, so every non-zero value maps back to a valid catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[u8; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[0; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    /// Get the raw cell value at (x, y), or None outside the grid
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        if x < 0 || y < 0 || x >= BOARD_WIDTH as i32 || y >= BOARD_HEIGHT as i32 {
            return None;
        }
        Some(self.cells[y as usize][x as usize])
    }

    /// Check whether a shape placed with its origin at (x, y) fits
    ///
    /// A placement is invalid when any occupied cell lands outside the side
    /// walls, below the floor, or on a settled cell. Cells above the top edge
    /// (y < 0) are never tested against occupancy, which lets pieces spawn
    /// and rotate partially above the visible grid.
    pub fn is_valid_move(&self, shape: &[Vec<u8>], x: i32, y: i32) -> bool {
        for (py, row) in shape.iter().enumerate() {
            for (px, &cell) in row.iter().enumerate() {
                if cell == 0 {
                    continue;
                }
                let nx = x + px as i32;
                let ny = y + py as i32;
                if nx < 0 || nx >= BOARD_WIDTH as i32 || ny >= BOARD_HEIGHT as i32 {
                    return false;
                }
                if ny >= 0 && self.cells[ny as usize][nx as usize] != 0 {
                    return false;
                }
            }
        }
        true
    }

    /// Write a piece into the grid at (x, y), tagging cells with its identity
    ///
    /// Cells that fall above the top edge are silently dropped; that loss is
    /// the precursor to the spawn-collision game over. Returns the set of
    /// coordinates actually written, for the transient lock highlight.
    pub fn lock(&mut self, shape: &[Vec<u8>], x: i32, y: i32, kind: PieceType) -> HashSet<(i32, i32)> {
        let mut written = HashSet::new();
        for (py, row) in shape.iter().enumerate() {
            for (px, &cell) in row.iter().enumerate() {
                if cell == 0 {
                    continue;
                }
                let nx = x + px as i32;
                let ny = y + py as i32;
                if ny >= 0 && ny < BOARD_HEIGHT as i32 && nx >= 0 && nx < BOARD_WIDTH as i32 {
                    self.cells[ny as usize][nx as usize] = kind.id() + 1;
                    written.insert((nx, ny));
                }
            }
        }
        written
    }

    /// Remove all full rows at once and return how many were cleared
    ///
    /// Remaining rows keep their relative order and fall as a block; that
    /// many empty rows are inserted at the top, so the grid height never
    /// changes.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut write_row = BOARD_HEIGHT;
        let mut cleared = 0;

        for read_row in (0..BOARD_HEIGHT).rev() {
            if self.cells[read_row].iter().all(|&cell| cell != 0) {
                cleared += 1;
            } else {
                write_row -= 1;
                if write_row != read_row {
                    self.cells[write_row] = self.cells[read_row];
                }
            }
        }

        for row in 0..cleared {
            self.cells[row] = [0; BOARD_WIDTH];
        }

        cleared
    }

    /// Iterate rows top to bottom (for rendering and the display grid)
    pub fn rows(&self) -> impl Iterator<Item = &[u8; BOARD_WIDTH]> {
        self.cells.iter()
    }

    #[cfg(test)]
    pub(crate) fn set(&mut self, x: usize, y: usize, value: u8) {
        self.cells[y][x] = value;
    }
}
