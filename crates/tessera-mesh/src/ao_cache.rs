//! Lazily computed, edit-invalidated ambient occlusion per block.

use glam::IVec3;
use rustc_hash::FxHashMap;
use tessera_voxel::{Occupancy, VoxelEdit};

use crate::ambient_occlusion::{AoSettings, BlockShade, compute_all};

/// Cached shading for one block.
#[derive(Clone, Debug)]
struct AoEntry {
    shade: BlockShade,
    dirty: bool,
}

/// Per-cell cache of [`BlockShade`] arrays.
///
/// Entries are created on first query and recomputed on the next query
/// after being marked dirty. A block's shading depends on every cell within
/// one step of it, diagonals included, so an occupancy change at `c` must be
/// followed by [`mark_dirty_neighborhood`](Self::mark_dirty_neighborhood)`(c)`.
#[derive(Clone, Debug, Default)]
pub struct AoCache {
    settings: AoSettings,
    entries: FxHashMap<IVec3, AoEntry>,
}

impl AoCache {
    /// Creates an empty cache with the given brightness curve.
    pub fn new(settings: AoSettings) -> Self {
        Self {
            settings,
            entries: FxHashMap::default(),
        }
    }

    /// The brightness curve in use.
    pub fn settings(&self) -> &AoSettings {
        &self.settings
    }

    /// Replaces the brightness curve and marks every entry dirty.
    pub fn set_settings(&mut self, settings: AoSettings) {
        self.settings = settings;
        for entry in self.entries.values_mut() {
            entry.dirty = true;
        }
    }

    /// Returns the shading for `cell`, computing it if missing or dirty.
    pub fn get_or_compute(&mut self, world: &impl Occupancy, cell: IVec3) -> &BlockShade {
        let settings = self.settings;
        let entry = self.entries.entry(cell).or_insert_with(|| AoEntry {
            shade: compute_all(world, cell, &settings),
            dirty: false,
        });
        if entry.dirty {
            entry.shade = compute_all(world, cell, &settings);
            entry.dirty = false;
        }
        &entry.shade
    }

    /// Returns the cached shading without recomputing, if clean.
    pub fn get_clean(&self, cell: IVec3) -> Option<&BlockShade> {
        self.entries
            .get(&cell)
            .filter(|entry| !entry.dirty)
            .map(|entry| &entry.shade)
    }

    /// Flags one cell for recomputation. Cells never queried are ignored.
    pub fn mark_dirty(&mut self, cell: IVec3) {
        if let Some(entry) = self.entries.get_mut(&cell) {
            entry.dirty = true;
        }
    }

    /// Flags the inclusive 3×3×3 block centred on `cell`.
    pub fn mark_dirty_neighborhood(&mut self, cell: IVec3) {
        for dy in -1..=1 {
            for dz in -1..=1 {
                for dx in -1..=1 {
                    self.mark_dirty(cell + IVec3::new(dx, dy, dz));
                }
            }
        }
    }

    /// Invalidates the neighbourhood of every edit, and drops entries for
    /// cells that were removed.
    pub fn apply_edits(&mut self, edits: impl IntoIterator<Item = VoxelEdit>) {
        let mut count = 0usize;
        for edit in edits {
            self.mark_dirty_neighborhood(edit.cell);
            if edit.kind == tessera_voxel::EditKind::Removed {
                self.evict(edit.cell);
            }
            count += 1;
        }
        if count > 0 {
            tracing::trace!(count, "ao cache invalidated by voxel edits");
        }
    }

    /// Drops the entry for `cell`.
    pub fn evict(&mut self, cell: IVec3) {
        self.entries.remove(&cell);
    }

    /// Returns `true` if `cell` has an entry awaiting recomputation.
    pub fn is_dirty(&self, cell: IVec3) -> bool {
        self.entries.get(&cell).is_some_and(|entry| entry.dirty)
    }

    /// Number of cached entries, clean or dirty.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
