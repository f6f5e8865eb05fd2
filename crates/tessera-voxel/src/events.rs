//! Voxel edit events.
//!
//! Every occupancy change made through [`place_voxel`], [`remove_voxel`] or
//! [`move_voxel`] is recorded in a [`VoxelEditBuffer`]. Downstream caches
//! drain it to invalidate exactly the cells that changed.

use glam::IVec3;

use crate::store::VoxelStore;

/// What happened to a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditKind {
    /// The cell became occupied.
    Added,
    /// The cell became empty.
    Removed,
}

/// Emitted when a single cell changes occupancy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VoxelEdit {
    /// The cell whose occupancy changed.
    pub cell: IVec3,
    /// Direction of the change.
    pub kind: EditKind,
}

/// Pending edits, drained once per frame by the consumer.
#[derive(Clone, Debug, Default)]
pub struct VoxelEditBuffer {
    pending: Vec<VoxelEdit>,
}

impl VoxelEditBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an edit.
    pub fn send(&mut self, edit: VoxelEdit) {
        self.pending.push(edit);
    }

    /// Iterates pending edits without consuming them.
    pub fn read(&self) -> impl Iterator<Item = &VoxelEdit> {
        self.pending.iter()
    }

    /// Removes and returns all pending edits in the order they were made.
    pub fn drain(&mut self) -> impl Iterator<Item = VoxelEdit> + '_ {
        self.pending.drain(..)
    }

    /// Number of pending edits.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drops all pending edits.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Occupies `cell` and records the edit if it was empty.
pub fn place_voxel(store: &mut VoxelStore, cell: IVec3, events: &mut VoxelEditBuffer) -> bool {
    if !store.add(cell) {
        return false;
    }
    events.send(VoxelEdit {
        cell,
        kind: EditKind::Added,
    });
    true
}

/// Clears `cell` and records the edit if it was occupied.
pub fn remove_voxel(store: &mut VoxelStore, cell: IVec3, events: &mut VoxelEditBuffer) -> bool {
    if !store.remove(cell) {
        return false;
    }
    events.send(VoxelEdit {
        cell,
        kind: EditKind::Removed,
    });
    true
}

/// Moves an occupied cell and records a removal followed by an addition.
///
/// Returns `false` (and records nothing) if `from` is empty or equals `to`.
pub fn move_voxel(
    store: &mut VoxelStore,
    from: IVec3,
    to: IVec3,
    events: &mut VoxelEditBuffer,
) -> bool {
    let target_was_empty = !store.occupied(to.x, to.y, to.z);
    if !store.move_cell(from, to) {
        return false;
    }
    events.send(VoxelEdit {
        cell: from,
        kind: EditKind::Removed,
    });
    if target_was_empty {
        events.send(VoxelEdit {
            cell: to,
            kind: EditKind::Added,
        });
    }
    true
}
