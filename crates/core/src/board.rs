//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell can be empty or filled with a piece kind.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom)

use arrayvec::ArrayVec;

use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH * BOARD_HEIGHT) as usize;

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// Row-major grid of wire ids (0 = empty, 1-7 = piece kind).
pub type BoardGrid = [[u8; WIDTH]; HEIGHT];

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Build a board from a grid of wire ids.
    ///
    /// Returns `None` if any cell holds a value outside 0..=7.
    pub fn from_grid(grid: &BoardGrid) -> Option<Self> {
        let mut board = Self::new();
        for (y, row) in grid.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                board.cells[y * WIDTH + x] = match v {
                    0 => None,
                    id => Some(PieceKind::from_id(id)?),
                };
            }
        }
        Some(board)
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is valid (within bounds and empty)
    #[inline]
    pub fn is_valid(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= HEIGHT {
            return false;
        }
        let start = y * WIDTH;
        self.cells[start..start + WIDTH].iter().all(|cell| cell.is_some())
    }

    /// Number of rows that are completely filled
    pub fn count_full_rows(&self) -> usize {
        (0..HEIGHT).filter(|&y| self.is_row_full(y)).count()
    }

    /// Clear all full rows and return the row indices that were cleared (sorted bottom to top).
    ///
    /// Remaining rows keep their relative order and settle to the bottom; one
    /// empty row is inserted at the top for every row removed.
    /// Uses a two-pointer pass with zero allocation.
    pub fn clear_full_rows(&mut self) -> ArrayVec<usize, HEIGHT> {
        let mut cleared_rows = ArrayVec::new();
        let mut write_y = HEIGHT;

        // Scan from bottom to top
        for read_y in (0..HEIGHT).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    // copy_within handles overlap
                    let src_start = read_y * WIDTH;
                    let dst_start = write_y * WIDTH;
                    self.cells
                        .copy_within(src_start..src_start + WIDTH, dst_start);
                }
            }
        }

        // Clear the remaining rows at the top
        for cell in &mut self.cells[..write_y * WIDTH] {
            *cell = None;
        }

        cleared_rows
    }

    /// Lock a piece onto the board at given position with given shape
    /// Returns true if successful, false if any cell is out of bounds or occupied
    pub fn lock_piece(&mut self, shape: &[(i8, i8)], x: i8, y: i8, kind: PieceKind) -> bool {
        // First check if all positions are valid
        if !shape.iter().all(|&(dx, dy)| self.is_valid(x + dx, y + dy)) {
            return false;
        }

        for &(dx, dy) in shape {
            self.set(x + dx, y + dy, Some(kind));
        }

        true
    }

    /// Height of column `x`: 20 minus the row of its topmost filled cell, 0 if empty.
    pub fn column_height(&self, x: usize) -> u8 {
        if x >= WIDTH {
            return 0;
        }
        (0..HEIGHT)
            .find(|&y| self.cells[y * WIDTH + x].is_some())
            .map_or(0, |top| (HEIGHT - top) as u8)
    }

    /// Heights of all ten columns
    pub fn column_heights(&self) -> [u8; WIDTH] {
        let mut heights = [0u8; WIDTH];
        for (x, h) in heights.iter_mut().enumerate() {
            *h = self.column_height(x);
        }
        heights
    }

    /// Empty cells with at least one filled cell above them in the same column
    pub fn count_holes(&self) -> usize {
        let mut holes = 0;
        for x in 0..WIDTH {
            let mut covered = false;
            for y in 0..HEIGHT {
                if self.cells[y * WIDTH + x].is_some() {
                    covered = true;
                } else if covered {
                    holes += 1;
                }
            }
        }
        holes
    }

    /// Write the board as wire ids into `out`.
    pub fn write_u8_grid(&self, out: &mut BoardGrid) {
        for (y, row) in out.iter_mut().enumerate() {
            for (x, v) in row.iter_mut().enumerate() {
                *v = self.cells[y * WIDTH + x].map_or(0, PieceKind::id);
            }
        }
    }

    /// The board as a grid of wire ids
    pub fn to_grid(&self) -> BoardGrid {
        let mut grid = [[0u8; WIDTH]; HEIGHT];
        self.write_u8_grid(&mut grid);
        grid
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, y: i8, except: Option<i8>) {
        for x in 0..BOARD_WIDTH as i8 {
            if Some(x) != except {
                board.set(x, y, Some(PieceKind::I));
            }
        }
    }

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_clear_full_rows_keeps_order() {
        let mut board = Board::new();
        fill_row(&mut board, 19, None);
        fill_row(&mut board, 18, Some(0));
        fill_row(&mut board, 17, None);
        board.set(5, 16, Some(PieceKind::T));

        let cleared = board.clear_full_rows();
        assert_eq!(cleared.as_slice(), &[19, 17]);

        // Row 18 (with a gap at column 0) is now the bottom row
        assert_eq!(board.get(0, 19), Some(None));
        assert_eq!(board.get(1, 19), Some(Some(PieceKind::I)));
        // The lone T cell moved down by two
        assert_eq!(board.get(5, 18), Some(Some(PieceKind::T)));
        assert!((0..2).all(|y| (0..10).all(|x| board.get(x, y) == Some(None))));
    }

    #[test]
    fn test_clear_full_rows_without_full_rows_is_noop() {
        let mut board = Board::new();
        fill_row(&mut board, 19, Some(3));
        board.set(2, 10, Some(PieceKind::Z));
        let before = board.clone();

        assert!(board.clear_full_rows().is_empty());
        assert_eq!(board, before);
    }

    #[test]
    fn test_column_heights_and_holes() {
        let mut board = Board::new();
        board.set(0, 19, Some(PieceKind::O));
        board.set(1, 15, Some(PieceKind::O));

        let heights = board.column_heights();
        assert_eq!(heights[0], 1);
        assert_eq!(heights[1], 5);
        assert_eq!(heights[2], 0);
        // Column 1 has four empty cells below its top
        assert_eq!(board.count_holes(), 4);
    }

    #[test]
    fn test_grid_roundtrip_and_rejects_bad_ids() {
        let mut board = Board::new();
        board.set(3, 7, Some(PieceKind::L));
        let grid = board.to_grid();
        assert_eq!(grid[7][3], 4);
        assert_eq!(Board::from_grid(&grid), Some(board));

        let mut bad = grid;
        bad[0][0] = 8;
        assert_eq!(Board::from_grid(&bad), None);
    }

    #[test]
    fn test_lock_piece_rejects_overlap() {
        let mut board = Board::new();
        board.set(4, 19, Some(PieceKind::S));
        let before = board.clone();

        assert!(!board.lock_piece(&[(0, 0), (1, 0)], 4, 19, PieceKind::O));
        assert_eq!(board, before);
    }
}
