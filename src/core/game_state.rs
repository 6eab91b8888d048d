//! Game state module - the grid/merge engine
//!
//! Ties together the grid, tile arena, RNG, level window, and scoring into
//! a single deterministic state machine. Each `move_tiles` call is one
//! atomic turn: slide/merge, then spawn, then the game-over scan. The
//! engine never touches storage or rendering; observers consume the
//! returned `MoveOutcome` and `snapshot()`.

use crate::core::level::{LevelConfig, STAGE_COUNT};
use crate::core::scoring::{merge_points, stage_progress};
use crate::core::snapshot::{GameSnapshot, TileSnapshot};
use crate::core::tile::{Tile, TileId, TileSet};
use crate::core::{Grid, SimpleRng};
use crate::persist::{SavedGame, SavedTile};
use crate::types::{Direction, GameConfig, GameStatus, GRID_CELLS, GRID_SIZE};

use arrayvec::ArrayVec;

/// What a single `move_tiles` call did, for observers and persisters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// At least one tile slid or merged; false means the move was a no-op
    /// (no spawn, no save, no game-over evaluation)
    pub moved: bool,
    /// Completed merges this move (the winning merge is not counted here)
    pub merges: u8,
    /// Score gained this move, `2^(new level)` per merge
    pub score_gained: u32,
    /// Tile spawned after a productive move
    pub spawned: Option<TileId>,
    /// A merge reached the stage target; the move halted immediately
    pub won: bool,
    /// Board is full with no adjacent equal pair after this move
    pub collapsed: bool,
}

/// Result of advancing one tile a single step along the move direction
enum StepOutcome {
    /// Tile relocated into an empty cell, keep advancing
    Slid,
    /// Tile merged into a neighbor and stops for this move
    Merged,
    /// Merge reached the stage target, halt the whole move
    Won,
    /// Edge of the board, a different level, or an already-merged neighbor
    Settled,
}

/// Complete engine state for one stage
#[derive(Debug, Clone)]
pub struct GameState {
    grid: Grid,
    tiles: TileSet,
    score: u32,
    current_level: u32,
    status: GameStatus,
    rng: SimpleRng,
    config: GameConfig,
}

impl GameState {
    /// Create an empty engine for a stage; call `restart` to deal the board
    pub fn new(current_level: u32, seed: u32) -> Self {
        Self::with_config(current_level, seed, GameConfig::default())
    }

    pub fn with_config(current_level: u32, seed: u32, config: GameConfig) -> Self {
        Self {
            grid: Grid::new(),
            tiles: TileSet::new(),
            score: 0,
            current_level: current_level.clamp(1, STAGE_COUNT),
            status: GameStatus::Playing,
            rng: SimpleRng::new(seed),
            config,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    /// Merge window for the current stage, derived on demand
    pub fn level_config(&self) -> LevelConfig {
        LevelConfig::for_stage(self.current_level, &self.config)
    }

    /// Highest tile level on the board
    pub fn max_tile_level(&self) -> Option<u8> {
        self.tiles.max_level()
    }

    /// Stage progress fraction for the progress bar
    pub fn progress(&self) -> f32 {
        let window = self.level_config();
        let max = self.max_tile_level().unwrap_or(window.start);
        stage_progress(max, &window)
    }

    /// Clear the board and deal a fresh stage: score 0, two spawned tiles
    pub fn restart(&mut self) {
        self.grid.clear();
        self.tiles.clear();
        self.score = 0;
        self.status = GameStatus::Playing;
        self.spawn_tile();
        self.spawn_tile();
    }

    /// After a won stage, step to the next stage and deal it.
    /// Returns false (and does nothing) unless the stage was won.
    pub fn advance_level(&mut self) -> bool {
        if self.status != GameStatus::LevelWon {
            return false;
        }
        self.current_level = (self.current_level + 1).min(STAGE_COUNT);
        self.restart();
        true
    }

    /// External stage switch (level select); deals the chosen stage
    pub fn select_level(&mut self, level: u32) {
        self.current_level = level.clamp(1, STAGE_COUNT);
        self.restart();
    }

    /// Place a tile directly (sandbox experimentation and deterministic
    /// board setup). Returns None if the cell is occupied or out of bounds.
    pub fn place_tile(&mut self, row: u8, col: u8, level: u8) -> Option<TileId> {
        if !self.grid.is_vacant(row as i8, col as i8) {
            return None;
        }
        let id = self.tiles.insert(Tile { row, col, level });
        self.grid.set(row as i8, col as i8, Some(id));
        Some(id)
    }

    /// Spawn one tile on a uniformly chosen empty cell.
    ///
    /// Level is the stage start with probability `spawn_chance`, else one
    /// offset above. A full board is a no-op, not an error.
    pub fn spawn_tile(&mut self) -> Option<TileId> {
        let empty = self.grid.empty_cells();
        if empty.is_empty() {
            return None;
        }
        let (row, col) = empty[self.rng.next_range(empty.len() as u32) as usize];
        let window = self.level_config();
        let level = if self.rng.chance(self.config.spawn_chance) {
            window.start
        } else {
            window.start + self.config.spawn_level_offset
        };
        self.place_tile(row, col, level)
    }

    /// Apply one directional move: slide and merge every tile, then spawn
    /// and evaluate game over. No motion anywhere makes the whole call a
    /// no-op. A winning merge halts processing immediately; tiles not yet
    /// reached keep their pre-move positions (specified contract, not
    /// rolled back).
    pub fn move_tiles(&mut self, direction: Direction) -> MoveOutcome {
        let mut outcome = MoveOutcome::default();
        if self.status != GameStatus::Playing {
            return outcome;
        }

        let (dr, dc) = direction.step();
        let order = direction.scan_order();
        let window = self.level_config();
        let mut merged_this_turn: ArrayVec<TileId, { GRID_CELLS / 2 }> = ArrayVec::new();

        // Snapshot source cells up front; destination occupancy still
        // changes underneath as earlier tiles settle.
        let mut sources: ArrayVec<(u8, u8), GRID_CELLS> = ArrayVec::new();
        for &row in &order {
            for &col in &order {
                if self.grid.tile_at(row, col).is_some() {
                    sources.push((row, col));
                }
            }
        }

        'scan: for (row, col) in sources {
            let Some(id) = self.grid.tile_at(row, col) else {
                continue;
            };
            loop {
                match self.advance_tile(id, dr, dc, &window, &mut merged_this_turn, &mut outcome) {
                    StepOutcome::Slid => continue,
                    StepOutcome::Merged | StepOutcome::Settled => break,
                    StepOutcome::Won => {
                        self.status = GameStatus::LevelWon;
                        outcome.won = true;
                        break 'scan;
                    }
                }
            }
        }

        if outcome.moved && !outcome.won {
            outcome.spawned = self.spawn_tile();
            if self.check_game_over() {
                self.status = GameStatus::Collapsed;
                outcome.collapsed = true;
            }
        }
        outcome
    }

    /// Try to advance one tile a single step along (dr, dc)
    fn advance_tile(
        &mut self,
        id: TileId,
        dr: i8,
        dc: i8,
        window: &LevelConfig,
        merged_this_turn: &mut ArrayVec<TileId, { GRID_CELLS / 2 }>,
        outcome: &mut MoveOutcome,
    ) -> StepOutcome {
        let Some(tile) = self.tiles.get(id) else {
            return StepOutcome::Settled;
        };
        let (row, col) = (tile.row as i8, tile.col as i8);
        let level = tile.level;
        let (next_row, next_col) = (row + dr, col + dc);

        match self.grid.get(next_row, next_col) {
            // Off-grid: settle in place
            None => StepOutcome::Settled,
            // Empty: relocate and keep advancing
            Some(None) => {
                self.grid.set(row, col, None);
                self.grid.set(next_row, next_col, Some(id));
                if let Some(tile) = self.tiles.get_mut(id) {
                    tile.row = next_row as u8;
                    tile.col = next_col as u8;
                }
                outcome.moved = true;
                StepOutcome::Slid
            }
            Some(Some(other_id)) => {
                let other_level = match self.tiles.get(other_id) {
                    Some(other) => other.level,
                    None => return StepOutcome::Settled,
                };
                if other_level != level || merged_this_turn.contains(&other_id) {
                    return StepOutcome::Settled;
                }

                // Merge: the moving tile levels up and absorbs the score
                let new_level = level + 1;
                if let Some(tile) = self.tiles.get_mut(id) {
                    tile.level = new_level;
                }
                let points = merge_points(new_level);
                self.score += points;
                outcome.score_gained += points;

                // A merge that reaches the target wins the stage and the
                // move halts here: the neighbor survives and the moving
                // tile stays put. At-ceiling stages can no longer win.
                if new_level >= window.target && !window.at_ceiling() {
                    return StepOutcome::Won;
                }

                self.tiles.remove(other_id);
                self.grid.set(row, col, None);
                self.grid.set(next_row, next_col, Some(id));
                if let Some(tile) = self.tiles.get_mut(id) {
                    tile.row = next_row as u8;
                    tile.col = next_col as u8;
                }
                merged_this_turn.push(id);
                outcome.merges += 1;
                outcome.moved = true;
                StepOutcome::Merged
            }
        }
    }

    /// True iff the board is full and no two grid-adjacent cells hold
    /// equal-level tiles. Pure O(size^2) scan.
    pub fn check_game_over(&self) -> bool {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let Some(level) = self.level_at(row, col) else {
                    return false;
                };
                if row + 1 < GRID_SIZE && self.level_at(row + 1, col) == Some(level) {
                    return false;
                }
                if col + 1 < GRID_SIZE && self.level_at(row, col + 1) == Some(level) {
                    return false;
                }
            }
        }
        true
    }

    fn level_at(&self, row: u8, col: u8) -> Option<u8> {
        let id = self.grid.tile_at(row, col)?;
        self.tiles.get(id).map(|tile| tile.level)
    }

    /// Persistable snapshot of this stage
    pub fn save_data(&self) -> SavedGame {
        SavedGame {
            tiles: self
                .tiles
                .iter()
                .map(|(_, tile)| SavedTile {
                    row: tile.row,
                    col: tile.col,
                    level: tile.level,
                })
                .collect(),
            score: self.score,
            level: self.current_level,
        }
    }

    /// Rebuild a stage from a persisted snapshot.
    ///
    /// Returns None when the snapshot belongs to a different stage than the
    /// one being resumed, or when it is malformed (out-of-bounds or
    /// colliding tiles) - callers treat that as "no saved state".
    pub fn restore(
        save: &SavedGame,
        current_level: u32,
        seed: u32,
        config: GameConfig,
    ) -> Option<Self> {
        if save.level != current_level {
            return None;
        }
        let mut state = Self::with_config(current_level, seed, config);
        for saved in &save.tiles {
            state.place_tile(saved.row, saved.col, saved.level)?;
        }
        state.score = save.score;
        Some(state)
    }

    /// Write the observable state into a reusable snapshot buffer
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.tiles.clear();
        for (id, tile) in self.tiles.iter() {
            out.tiles.push(TileSnapshot::new(id, tile));
        }
        out.score = self.score;
        out.current_level = self.current_level;
        out.status = self.status;
        out.max_tile_level = self.max_tile_level();
        out.progress = self.progress();
        out.seed = self.rng.seed();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut snap = GameSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_state() -> GameState {
        GameState::new(1, 12345)
    }

    #[test]
    fn test_new_state() {
        let state = empty_state();
        assert_eq!(state.score(), 0);
        assert_eq!(state.current_level(), 1);
        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.tile_count(), 0);
        assert_eq!(state.level_config(), LevelConfig { start: 0, target: 3 });
    }

    #[test]
    fn test_restart_deals_two_tiles() {
        let mut state = empty_state();
        state.restart();

        assert_eq!(state.tile_count(), 2);
        assert_eq!(state.score(), 0);
        let window = state.level_config();
        for (_, tile) in state.tiles.iter() {
            assert!(tile.level == window.start || tile.level == window.start + 1);
        }
    }

    #[test]
    fn test_spawn_respects_occupancy() {
        let mut state = empty_state();
        for _ in 0..GRID_CELLS {
            assert!(state.spawn_tile().is_some());
        }
        assert_eq!(state.tile_count(), GRID_CELLS);
        assert!(state.grid().is_full());

        // Full board: spawn is a no-op, not an error
        assert!(state.spawn_tile().is_none());
        assert_eq!(state.tile_count(), GRID_CELLS);
    }

    #[test]
    fn test_place_tile_rejects_occupied() {
        let mut state = empty_state();
        assert!(state.place_tile(1, 1, 0).is_some());
        assert!(state.place_tile(1, 1, 2).is_none());
        assert!(state.place_tile(4, 0, 0).is_none());
    }

    #[test]
    fn test_slide_left_to_edge() {
        let mut state = empty_state();
        let id = state.place_tile(2, 3, 0).unwrap();

        let outcome = state.move_tiles(Direction::Left);
        assert!(outcome.moved);
        assert_eq!(outcome.merges, 0);
        assert_eq!(outcome.score_gained, 0);

        let tile = state.tile(id).unwrap();
        assert_eq!((tile.row, tile.col), (2, 0));
        assert_eq!(state.grid().tile_at(2, 0), Some(id));
        // Productive move spawns exactly one tile
        assert!(outcome.spawned.is_some());
        assert_eq!(state.tile_count(), 2);
    }

    #[test]
    fn test_merge_adjacent_pair() {
        let mut state = empty_state();
        let keeper = state.place_tile(0, 1, 1).unwrap();
        let gone = state.place_tile(0, 0, 1).unwrap();

        let outcome = state.move_tiles(Direction::Left);
        assert!(outcome.moved);
        assert_eq!(outcome.merges, 1);
        assert_eq!(outcome.score_gained, merge_points(2));
        assert!(!outcome.won);

        // Moving tile absorbed the neighbor at the destination edge
        assert!(!state.tiles.contains(gone));
        let tile = state.tile(keeper).unwrap();
        assert_eq!((tile.row, tile.col, tile.level), (0, 0, 2));
        assert_eq!(state.score(), 4);
        assert_eq!(state.tile_count(), 2); // merged tile + spawn
    }

    #[test]
    fn test_no_motion_is_noop() {
        let mut state = empty_state();
        state.place_tile(0, 0, 0);
        state.place_tile(0, 1, 1);

        let outcome = state.move_tiles(Direction::Left);
        assert!(!outcome.moved);
        assert!(outcome.spawned.is_none());
        assert_eq!(state.tile_count(), 2);
        assert_eq!(state.score(), 0);
        assert_eq!(state.status(), GameStatus::Playing);
    }

    #[test]
    fn test_one_merge_per_tile_per_move() {
        // [1, 1, 1, 1] -> left must become [2, 2], not [3]
        let mut state = empty_state();
        for col in 0..4 {
            state.place_tile(0, col, 1);
        }

        let outcome = state.move_tiles(Direction::Left);
        assert_eq!(outcome.merges, 2);
        assert_eq!(state.level_at(0, 0), Some(2));
        assert_eq!(state.level_at(0, 1), Some(2));
        assert_eq!(outcome.score_gained, 2 * merge_points(2));
        assert_eq!(state.tile_count(), 3); // two merged tiles + spawn
    }

    #[test]
    fn test_triple_merges_only_front_pair() {
        // [1, 1, 1] -> left: front pair merges, trailing tile slides behind
        let mut state = empty_state();
        for col in 0..3 {
            state.place_tile(0, col, 1);
        }

        let outcome = state.move_tiles(Direction::Left);
        assert_eq!(outcome.merges, 1);
        assert_eq!(state.level_at(0, 0), Some(2));
        assert_eq!(state.level_at(0, 1), Some(1));
    }

    #[test]
    fn test_winning_merge_halts_move() {
        let mut state = empty_state(); // stage 1: start 0, target 3
        let winner = state.place_tile(0, 1, 2).unwrap();
        let survivor = state.place_tile(0, 0, 2).unwrap();
        let bystander = state.place_tile(3, 3, 0).unwrap();

        let outcome = state.move_tiles(Direction::Left);
        assert!(outcome.won);
        assert!(!outcome.collapsed);
        assert!(outcome.spawned.is_none());
        assert_eq!(state.status(), GameStatus::LevelWon);

        // Score applied, but the merge is otherwise left pending: the
        // neighbor survives and the winner stays put
        assert_eq!(outcome.score_gained, merge_points(3));
        assert_eq!(state.tile(winner).map(|t| t.level), Some(3));
        assert!(state.tiles.contains(survivor));
        // Tiles after the winning merge keep their pre-move positions
        let tile = state.tile(bystander).unwrap();
        assert_eq!((tile.row, tile.col), (3, 3));
        assert_eq!(state.tile_count(), 3);
    }

    #[test]
    fn test_moves_rejected_after_terminal_state() {
        let mut state = empty_state();
        state.place_tile(0, 0, 2);
        state.place_tile(0, 1, 2);
        assert!(state.move_tiles(Direction::Left).won);

        let outcome = state.move_tiles(Direction::Right);
        assert!(!outcome.moved);
        assert_eq!(state.status(), GameStatus::LevelWon);
    }

    #[test]
    fn test_advance_level_after_win() {
        let mut state = empty_state();
        state.place_tile(0, 0, 2);
        state.place_tile(0, 1, 2);
        state.move_tiles(Direction::Left);
        assert_eq!(state.status(), GameStatus::LevelWon);

        assert!(state.advance_level());
        assert_eq!(state.current_level(), 2);
        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.score(), 0);
        assert_eq!(state.tile_count(), 2);
        assert_eq!(state.level_config(), LevelConfig { start: 1, target: 4 });
    }

    #[test]
    fn test_advance_level_requires_win() {
        let mut state = empty_state();
        state.restart();
        assert!(!state.advance_level());
        assert_eq!(state.current_level(), 1);
    }

    #[test]
    fn test_at_ceiling_merge_never_wins() {
        let mut state = GameState::new(22, 7); // start == target == 21
        assert!(state.level_config().at_ceiling());
        state.place_tile(0, 0, 21);
        state.place_tile(0, 1, 21);

        let outcome = state.move_tiles(Direction::Left);
        assert!(!outcome.won);
        assert_eq!(outcome.merges, 1);
        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.level_at(0, 0), Some(22));
        assert_eq!(outcome.score_gained, merge_points(22));
    }

    #[test]
    fn test_game_over_detection() {
        let mut state = empty_state();
        // Checkerboard of alternating levels: full, no adjacent equal pair
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                state.place_tile(row, col, ((row + col) % 2) as u8);
            }
        }
        assert!(state.check_game_over());
    }

    #[test]
    fn test_game_over_false_with_adjacent_pair() {
        let mut state = empty_state();
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                state.place_tile(row, col, ((row + col) % 2) as u8);
            }
        }
        // Introduce one horizontally adjacent equal pair
        let id = state.grid.tile_at(0, 1).unwrap();
        state.tiles.get_mut(id).unwrap().level = 0;
        assert!(!state.check_game_over());
    }

    #[test]
    fn test_game_over_false_with_empty_cell() {
        let mut state = empty_state();
        state.place_tile(0, 0, 0);
        assert!(!state.check_game_over());
    }

    #[test]
    fn test_progress_tracks_max_tile() {
        let mut state = empty_state();
        state.place_tile(0, 0, 0);
        assert_eq!(state.progress(), crate::types::MIN_PROGRESS);

        state.place_tile(1, 1, 2);
        assert!((state.progress() - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_save_restore_roundtrip() {
        let mut state = empty_state();
        state.restart();
        state.move_tiles(Direction::Left);
        state.move_tiles(Direction::Up);

        let save = state.save_data();
        let restored =
            GameState::restore(&save, state.current_level(), 99, GameConfig::default()).unwrap();

        assert_eq!(restored.score(), state.score());
        assert_eq!(restored.tile_count(), state.tile_count());
        assert_eq!(restored.save_data(), save);
    }

    #[test]
    fn test_restore_rejects_level_mismatch() {
        let mut state = empty_state();
        state.restart();
        let save = state.save_data();

        assert!(GameState::restore(&save, 2, 1, GameConfig::default()).is_none());
    }

    #[test]
    fn test_restore_rejects_colliding_tiles() {
        let save = SavedGame {
            tiles: vec![
                SavedTile {
                    row: 0,
                    col: 0,
                    level: 1,
                },
                SavedTile {
                    row: 0,
                    col: 0,
                    level: 2,
                },
            ],
            score: 10,
            level: 1,
        };
        assert!(GameState::restore(&save, 1, 1, GameConfig::default()).is_none());
    }

    #[test]
    fn test_restore_rejects_out_of_bounds() {
        let save = SavedGame {
            tiles: vec![SavedTile {
                row: 7,
                col: 0,
                level: 1,
            }],
            score: 0,
            level: 1,
        };
        assert!(GameState::restore(&save, 1, 1, GameConfig::default()).is_none());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = empty_state();
        state.place_tile(2, 3, 1);

        let snap = state.snapshot();
        assert_eq!(snap.tiles.len(), 1);
        assert_eq!(snap.current_level, 1);
        assert_eq!(snap.max_tile_level, Some(1));
        let tile = snap.tile_at(2, 3).unwrap();
        assert_eq!(tile.level, 1);
        assert!(snap.playable());
    }

    #[test]
    fn test_deterministic_replay() {
        let run = |seed: u32| {
            let mut state = GameState::new(1, seed);
            state.restart();
            let dirs = [
                Direction::Left,
                Direction::Up,
                Direction::Right,
                Direction::Down,
            ];
            for i in 0..40 {
                if state.status().is_terminal() {
                    break;
                }
                state.move_tiles(dirs[i % 4]);
            }
            (state.score(), state.save_data())
        };
        assert_eq!(run(777), run(777));
    }
}
