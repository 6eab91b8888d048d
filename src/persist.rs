//! Persistence adapter - JSON save slots and progress records
//!
//! The engine returns pure state (`SavedGame`); this module decides what
//! and when to write. Slots are keyed by mode so sandbox experimentation
//! never corrupts the real save, and sandbox play never writes progress.
//! Unreadable or malformed files degrade to "no saved state" - the worst
//! outcome is a fresh deal, never a fault shown to the player.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One persisted tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTile {
    pub row: u8,
    pub col: u8,
    pub level: u8,
}

/// Persisted snapshot of an in-progress stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    pub tiles: Vec<SavedTile>,
    pub score: u32,
    pub level: u32,
}

/// Player progress, monotonically non-decreasing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub max_reached_level: u32,
    pub best_score: u32,
    pub current_level: u32,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            max_reached_level: 1,
            best_score: 0,
            current_level: 1,
        }
    }
}

impl ProgressRecord {
    /// Fold a score into the best-score record; true if it improved
    pub fn observe_score(&mut self, score: u32) -> bool {
        if score > self.best_score {
            self.best_score = score;
            return true;
        }
        false
    }

    /// Fold a reached stage into the record; true if it unlocked a new one
    pub fn observe_level(&mut self, level: u32) -> bool {
        self.current_level = level;
        if level > self.max_reached_level {
            self.max_reached_level = level;
            return true;
        }
        false
    }
}

/// Which save slot a session writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Experimentation slot: separate state file, progress never written
    Sandbox,
}

impl Mode {
    fn state_file(&self) -> &'static str {
        match self {
            Mode::Normal => "state.json",
            Mode::Sandbox => "sandbox_state.json",
        }
    }
}

/// File-backed store for saves and progress
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    mode: Mode,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>, mode: Mode) -> Self {
        Self {
            dir: dir.into(),
            mode,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    fn state_path(&self) -> PathBuf {
        self.dir.join(self.mode.state_file())
    }

    fn progress_path(&self) -> PathBuf {
        self.dir.join("progress.json")
    }

    fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Option<T> {
        let data = fs::read_to_string(path).ok()?;
        serde_json::from_str(&data).ok()
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating save dir {}", self.dir.display()))?;
        let data = serde_json::to_string(value).context("serializing save data")?;
        fs::write(path, data).with_context(|| format!("writing {}", path.display()))
    }

    /// Load this mode's saved stage; absent or malformed reads as None
    pub fn load_state(&self) -> Option<SavedGame> {
        Self::read_json(&self.state_path())
    }

    pub fn save_state(&self, save: &SavedGame) -> Result<()> {
        self.write_json(&self.state_path(), save)
    }

    /// Drop this mode's saved stage (level transition or full reset)
    pub fn clear_state(&self) -> Result<()> {
        let path = self.state_path();
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
        }
        Ok(())
    }

    /// Load the shared progress record; absent or malformed reads as default
    pub fn load_progress(&self) -> ProgressRecord {
        Self::read_json(&self.progress_path()).unwrap_or_default()
    }

    /// Persist the progress record. Sandbox sessions never write progress,
    /// so records stay untouched by experimentation.
    pub fn save_progress(&self, progress: &ProgressRecord) -> Result<()> {
        if self.mode == Mode::Sandbox {
            return Ok(());
        }
        self.write_json(&self.progress_path(), progress)
    }
}
