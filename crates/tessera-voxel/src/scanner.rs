//! Enumerates occupied cells overlapping a continuous axis-aligned box.

use glam::{IVec3, Vec3};

use crate::store::Occupancy;

/// Inclusive integer cell bounds derived from a continuous box.
///
/// Each continuous bound is floored independently, so a box whose max face
/// lies exactly on an integer plane includes the cell beyond that plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    /// Smallest cell on every axis.
    pub min: IVec3,
    /// Largest cell on every axis (inclusive).
    pub max: IVec3,
}

impl CellRange {
    /// Floors `min` and `max` component-wise.
    pub fn from_bounds(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.floor().as_ivec3(),
            max: max.floor().as_ivec3(),
        }
    }

    /// Returns `true` if the range covers no cell on some axis.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Iterates every cell in the range, Y outermost, then Z, then X.
    pub fn cells(self) -> impl Iterator<Item = IVec3> {
        let Self { min, max } = self;
        (min.y..=max.y).flat_map(move |y| {
            (min.z..=max.z).flat_map(move |z| (min.x..=max.x).map(move |x| IVec3::new(x, y, z)))
        })
    }
}

/// Visits every occupied cell whose floored coordinates fall inside
/// `[min, max]`, in Y-then-Z-then-X order.
pub fn for_each_in_range(
    world: &impl Occupancy,
    min: Vec3,
    max: Vec3,
    mut visit: impl FnMut(IVec3),
) {
    for cell in CellRange::from_bounds(min, max).cells() {
        if world.is_occupied(cell) {
            visit(cell);
        }
    }
}

/// Returns the occupied cells in `[min, max]` in scan order.
pub fn collect_in_range(world: &impl Occupancy, min: Vec3, max: Vec3) -> Vec<IVec3> {
    let mut hits = Vec::new();
    for_each_in_range(world, min, max, |cell| hits.push(cell));
    hits
}

/// Returns `true` as soon as any occupied cell is found in `[min, max]`.
pub fn any_in_range(world: &impl Occupancy, min: Vec3, max: Vec3) -> bool {
    CellRange::from_bounds(min, max)
        .cells()
        .any(|cell| world.is_occupied(cell))
}
