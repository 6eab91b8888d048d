//! Scoring module - merge points and stage progress
//!
//! A merge is worth `2^(new level)`, so higher-tier merges pay
//! exponentially more. Score only ever increases, and only on merges.

use crate::core::level::LevelConfig;
use crate::types::MIN_PROGRESS;

/// Points awarded for a merge that produced `new_level`
pub fn merge_points(new_level: u8) -> u32 {
    // Levels reachable on a 16-cell board stay far below 32
    1u32 << new_level.min(31)
}

/// Stage progress fraction in [MIN_PROGRESS, 1.0] for the progress bar.
///
/// `max_tile_level` is the highest level currently on the board. At-ceiling
/// stages have a zero-width window; any tile at the start level counts as
/// full progress there.
pub fn stage_progress(max_tile_level: u8, window: &LevelConfig) -> f32 {
    if window.at_ceiling() {
        return if max_tile_level >= window.start {
            1.0
        } else {
            MIN_PROGRESS
        };
    }
    let gained = max_tile_level.saturating_sub(window.start) as f32;
    (gained / window.span() as f32).clamp(MIN_PROGRESS, 1.0)
}
