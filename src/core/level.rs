//! Level module - element catalog and per-stage merge window
//!
//! A tile's `level` indexes the element catalog. Each stage challenges the
//! player to merge from `start` (the stage's base element) up to `target`.
//! The window is derived from the stage number, never stored.

use crate::types::GameConfig;

/// Ordered catalog of element names, lowest magnitude first.
///
/// The engine only consumes indices and the catalog length; the names are
/// exposed for observers that label tiles.
pub const ELEMENTS: [&str; 22] = [
    "QUARK",
    "PROTON",
    "ATOM",
    "CELL",
    "SPARK",
    "PULSE",
    "PLASMA",
    "LASER",
    "STAR",
    "NOVA",
    "PULSAR",
    "QUASAR",
    "SINGULARITY",
    "DARK MATTER",
    "EVENT HORIZON",
    "BLACK HOLE",
    "GALAXY",
    "CLUSTER",
    "UNIVERSE",
    "MULTIVERSE",
    "OMNIVERSE",
    "THE BIG BANG",
];

/// Highest valid element index
pub const MAX_ELEMENT_INDEX: u8 = (ELEMENTS.len() - 1) as u8;

/// Number of stages (one per catalog entry)
pub const STAGE_COUNT: u32 = ELEMENTS.len() as u32;

/// Display name for a tile level; levels past the catalog clamp to the last entry
pub fn element_name(level: u8) -> &'static str {
    ELEMENTS
        .get(level as usize)
        .copied()
        .unwrap_or(ELEMENTS[ELEMENTS.len() - 1])
}

/// Merge window of a single stage: tiles spawn at `start` and the stage is
/// won when a merge produces `target`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelConfig {
    pub start: u8,
    pub target: u8,
}

impl LevelConfig {
    /// Derive the window for a stage (stages are numbered from 1)
    pub fn for_stage(current_level: u32, config: &GameConfig) -> Self {
        let start = (current_level.saturating_sub(1)).min(MAX_ELEMENT_INDEX as u32) as u8;
        let target = start.saturating_add(config.evolution_steps).min(MAX_ELEMENT_INDEX);
        Self { start, target }
    }

    /// A stage whose start sits at the catalog ceiling has a clamped,
    /// zero-width window: merges keep working but can no longer win.
    /// End-of-content, not an error.
    pub fn at_ceiling(&self) -> bool {
        self.target <= self.start
    }

    /// Width of the merge window in element indices
    pub fn span(&self) -> u8 {
        self.target - self.start
    }
}
