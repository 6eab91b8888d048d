//! Core module - pure game logic with no external dependencies
//!
//! This module contains all the merge rules, state management, and logic.
//! It has zero dependencies on UI, networking, or I/O.

pub mod game_state;
pub mod grid;
pub mod level;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod tile;

// Re-export commonly used types
pub use game_state::{GameState, MoveOutcome};
pub use grid::Grid;
pub use level::{element_name, LevelConfig, ELEMENTS, MAX_ELEMENT_INDEX, STAGE_COUNT};
pub use rng::SimpleRng;
pub use scoring::{merge_points, stage_progress};
pub use snapshot::{GameSnapshot, TileSnapshot};
pub use tile::{Tile, TileId, TileSet};
