//! Neon Chain - grid/merge engine for a tile-merging puzzle game.
//!
//! Tiles carry a level indexing an ordered element catalog; each stage
//! challenges the player to merge up through a window of that catalog.
//! The `core` module owns every state transition (move, merge, spawn,
//! win/loss); `persist` is the storage adapter for saves and progress.
//! Rendering, input, and leaderboards live outside this crate and consume
//! engine snapshots.

pub mod core;
pub mod persist;
pub mod types;
