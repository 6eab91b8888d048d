//! Grid module - cell occupancy for the merge board
//!
//! The grid is a 4x4 matrix mapping each cell to at most one tile id.
//! Uses a flat array for cache locality and zero allocation.
//! Coordinates: (row, col) where row 0 is the top and col 0 is the left.
//! Tile payloads live in the `TileSet` arena; the grid only stores ids.

use arrayvec::ArrayVec;

use crate::core::tile::TileId;
use crate::types::{GRID_CELLS, GRID_SIZE};

/// Cell occupancy (None = empty)
pub type Cell = Option<TileId>;

/// The merge board - 4x4 cells using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grid {
    /// Flat array of cells, row-major order (row * SIZE + col)
    cells: [Cell; GRID_CELLS],
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate flat index from (row, col), None when out of bounds
    #[inline(always)]
    fn index(row: i8, col: i8) -> Option<usize> {
        if row < 0 || row >= GRID_SIZE as i8 || col < 0 || col >= GRID_SIZE as i8 {
            return None;
        }
        Some((row as usize) * (GRID_SIZE as usize) + (col as usize))
    }

    pub fn size(&self) -> u8 {
        GRID_SIZE
    }

    /// Get cell at (row, col); outer None means out of bounds
    pub fn get(&self, row: i8, col: i8) -> Option<Cell> {
        Self::index(row, col).map(|idx| self.cells[idx])
    }

    /// Set cell at (row, col); returns false when out of bounds
    pub fn set(&mut self, row: i8, col: i8, cell: Cell) -> bool {
        match Self::index(row, col) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Tile id occupying an in-bounds cell, if any
    pub fn tile_at(&self, row: u8, col: u8) -> Option<TileId> {
        self.get(row as i8, col as i8).flatten()
    }

    /// Check if position is within bounds and empty
    pub fn is_vacant(&self, row: i8, col: i8) -> bool {
        matches!(self.get(row, col), Some(None))
    }

    /// Check if position is within bounds and occupied
    pub fn is_occupied(&self, row: i8, col: i8) -> bool {
        matches!(self.get(row, col), Some(Some(_)))
    }

    pub fn is_out_of_bounds(&self, row: i8, col: i8) -> bool {
        Self::index(row, col).is_none()
    }

    /// Collect coordinates of all empty cells in row-major order
    pub fn empty_cells(&self) -> ArrayVec<(u8, u8), GRID_CELLS> {
        let mut empty = ArrayVec::new();
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if self.tile_at(row, col).is_none() {
                    empty.push((row, col));
                }
            }
        }
        empty
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        self.cells = [None; GRID_CELLS];
    }
}
