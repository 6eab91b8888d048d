//! Core types shared across the engine
//! This module contains pure data types with no external dependencies

/// Grid dimensions (the board is square)
pub const GRID_SIZE: u8 = 4;
pub const GRID_CELLS: usize = (GRID_SIZE as usize) * (GRID_SIZE as usize);

/// Stage progression: how many element indices a single stage spans
pub const EVOLUTION_STEPS_PER_LEVEL: u8 = 3;

/// Probability that a freshly spawned tile sits at the stage's start level
/// (otherwise it spawns one level above)
pub const SPAWN_NEW_TILE_CHANCE: f32 = 0.9;
pub const SPAWN_LEVEL_OFFSET: u8 = 1;

/// Floor for the stage progress fraction so the bar never fully empties
pub const MIN_PROGRESS: f32 = 0.05;

/// Directional move input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step (dr, dc) a tile takes along this direction
    pub fn step(&self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Row/column scan order for a move in this direction.
    ///
    /// Cells closest to the destination edge must be processed first so
    /// multi-tile chains collapse correctly in a single pass: ascending for
    /// up/left, descending for down/right.
    pub fn scan_order(&self) -> [u8; GRID_SIZE as usize] {
        match self {
            Direction::Up | Direction::Left => [0, 1, 2, 3],
            Direction::Down | Direction::Right => [3, 2, 1, 0],
        }
    }

    /// Parse direction from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Per-stage engine lifecycle
///
/// `Playing` is the only state that accepts moves. Both terminal states
/// require an external restart/advance to return to `Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Playing,
    LevelWon,
    Collapsed,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::Playing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Playing => "playing",
            GameStatus::LevelWon => "level_won",
            GameStatus::Collapsed => "collapsed",
        }
    }
}

/// Tunable engine parameters injected by the presenter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    /// Element indices a stage spans (`target - start`, before ceiling clamp)
    pub evolution_steps: u8,
    /// Probability a spawned tile lands at the stage start level
    pub spawn_chance: f32,
    /// Level offset applied when the spawn chance roll fails
    pub spawn_level_offset: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            evolution_steps: EVOLUTION_STEPS_PER_LEVEL,
            spawn_chance: SPAWN_NEW_TILE_CHANCE,
            spawn_level_offset: SPAWN_LEVEL_OFFSET,
        }
    }
}
