//! Tile arena - identity-bearing tiles in a generational slot map
//!
//! Tiles are compared by `TileId`, never by position or value, so
//! "already merged this turn" bookkeeping stays correct while tiles move.
//! Freed slots bump their generation on reuse, so a stale id held across a
//! merge can never alias the tile that later reuses the slot.
//! Iteration walks slots in ascending order, which gives serialization a
//! stable tile order.

use arrayvec::ArrayVec;

use crate::types::GRID_CELLS;

/// Stable identity of a live tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    slot: u16,
    generation: u16,
}

/// A leveled tile on the grid
///
/// `row`/`col` mirror the grid cell holding this tile's id; the grid is the
/// authority on occupancy, the tile on its own coordinates, and the engine
/// keeps the two in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub row: u8,
    pub col: u8,
    pub level: u8,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u16,
    tile: Option<Tile>,
}

/// Arena of live tiles - at most one per grid cell
#[derive(Debug, Clone, Default)]
pub struct TileSet {
    slots: ArrayVec<Slot, GRID_CELLS>,
    free: ArrayVec<u16, GRID_CELLS>,
}

impl TileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live tiles
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a tile, reusing a freed slot when one exists
    pub fn insert(&mut self, tile: Tile) -> TileId {
        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot as usize];
            entry.tile = Some(tile);
            TileId {
                slot,
                generation: entry.generation,
            }
        } else {
            let slot = self.slots.len() as u16;
            self.slots.push(Slot {
                generation: 0,
                tile: Some(tile),
            });
            TileId {
                slot,
                generation: 0,
            }
        }
    }

    /// Remove a tile, returning it if the id was live
    pub fn remove(&mut self, id: TileId) -> Option<Tile> {
        let entry = self.slots.get_mut(id.slot as usize)?;
        if entry.generation != id.generation {
            return None;
        }
        let tile = entry.tile.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.slot);
        Some(tile)
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        let entry = self.slots.get(id.slot as usize)?;
        if entry.generation != id.generation {
            return None;
        }
        entry.tile.as_ref()
    }

    pub fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        let entry = self.slots.get_mut(id.slot as usize)?;
        if entry.generation != id.generation {
            return None;
        }
        entry.tile.as_mut()
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate live tiles in ascending slot order
    pub fn iter(&self) -> impl Iterator<Item = (TileId, &Tile)> {
        self.slots.iter().enumerate().filter_map(|(slot, entry)| {
            entry.tile.as_ref().map(|tile| {
                (
                    TileId {
                        slot: slot as u16,
                        generation: entry.generation,
                    },
                    tile,
                )
            })
        })
    }

    /// Highest level among live tiles, if any
    pub fn max_level(&self) -> Option<u8> {
        self.iter().map(|(_, tile)| tile.level).max()
    }

    /// Drop all tiles and reset slot reuse
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
