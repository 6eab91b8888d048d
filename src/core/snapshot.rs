//! Read-only state snapshots handed to observers after each engine operation.
//!
//! Presenters re-render from the tile list; they never reach into the
//! engine's grid or arena.

use arrayvec::ArrayVec;

use crate::core::tile::{Tile, TileId};
use crate::types::{GameStatus, GRID_CELLS};

/// One tile as seen by an observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSnapshot {
    pub id: TileId,
    pub row: u8,
    pub col: u8,
    pub level: u8,
}

impl TileSnapshot {
    pub fn new(id: TileId, tile: &Tile) -> Self {
        Self {
            id,
            row: tile.row,
            col: tile.col,
            level: tile.level,
        }
    }
}

/// Full observable state of one stage
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    /// Live tiles in stable arena order
    pub tiles: ArrayVec<TileSnapshot, GRID_CELLS>,
    pub score: u32,
    pub current_level: u32,
    pub status: GameStatus,
    /// Highest tile level on the board, if any tile exists
    pub max_tile_level: Option<u8>,
    /// Stage progress fraction for the progress bar
    pub progress: f32,
    /// RNG state at snapshot time (replays the same spawn sequence)
    pub seed: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.score = 0;
        self.current_level = 1;
        self.status = GameStatus::Playing;
        self.max_tile_level = None;
        self.progress = 0.0;
        self.seed = 0;
    }

    pub fn playable(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Tile at a cell, if the snapshot holds one there
    pub fn tile_at(&self, row: u8, col: u8) -> Option<&TileSnapshot> {
        self.tiles.iter().find(|t| t.row == row && t.col == col)
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            tiles: ArrayVec::new(),
            score: 0,
            current_level: 1,
            status: GameStatus::Playing,
            max_tile_level: None,
            progress: 0.0,
            seed: 0,
        }
    }
}
