//! Sparse occupancy set for the voxel lattice.
//!
//! [`VoxelStore`] is the single authority for which cells are solid. Scans,
//! ray marches, collision and ambient occlusion all read it through the
//! [`Occupancy`] trait so they share one copy of the data.

use glam::IVec3;
use rustc_hash::FxHashSet;

/// Read-only occupancy lookup.
///
/// Cells that were never added are open air; there is no "unloaded" state.
pub trait Occupancy {
    /// Returns `true` if the cell at `cell` is solid.
    fn is_occupied(&self, cell: IVec3) -> bool;
}

/// Sparse set of occupied integer cells.
///
/// Cell `(x, y, z)` covers `[x, x+1) × [y, y+1) × [z, z+1)` in world space.
/// Per-cell payload (colour, material) is owned by the caller and keyed by the
/// same coordinate.
#[derive(Clone, Debug, Default)]
pub struct VoxelStore {
    cells: FxHashSet<IVec3>,
}

impl VoxelStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `(x, y, z)` is occupied.
    pub fn occupied(&self, x: i32, y: i32, z: i32) -> bool {
        self.cells.contains(&IVec3::new(x, y, z))
    }

    /// Marks a cell as occupied.
    ///
    /// Returns `true` if the cell was previously empty.
    pub fn add(&mut self, cell: IVec3) -> bool {
        self.cells.insert(cell)
    }

    /// Clears a cell. Removing an empty cell is a no-op.
    ///
    /// Returns `true` if the cell was previously occupied.
    pub fn remove(&mut self, cell: IVec3) -> bool {
        self.cells.remove(&cell)
    }

    /// Moves an occupied cell to `to`.
    ///
    /// Returns `true` if occupancy changed anywhere. Moving an empty cell
    /// does nothing; moving onto an occupied cell merges the two.
    pub fn move_cell(&mut self, from: IVec3, to: IVec3) -> bool {
        if from == to || !self.cells.remove(&from) {
            return false;
        }
        self.cells.insert(to);
        true
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over all occupied cells in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.cells.iter().copied()
    }

    /// Removes every cell.
    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

impl Occupancy for VoxelStore {
    fn is_occupied(&self, cell: IVec3) -> bool {
        self.cells.contains(&cell)
    }
}

impl<T: Occupancy + ?Sized> Occupancy for &T {
    fn is_occupied(&self, cell: IVec3) -> bool {
        (**self).is_occupied(cell)
    }
}

impl Extend<IVec3> for VoxelStore {
    fn extend<I: IntoIterator<Item = IVec3>>(&mut self, iter: I) {
        self.cells.extend(iter);
    }
}

impl FromIterator<IVec3> for VoxelStore {
    fn from_iter<I: IntoIterator<Item = IVec3>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
