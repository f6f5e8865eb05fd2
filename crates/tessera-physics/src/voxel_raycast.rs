//! First-hit voxel picking on top of the DDA grid march.
//!
//! Returns the first occupied cell along a ray together with the distance
//! travelled, the exact hit point, and the normal of the face that was
//! entered. Editors use the cell to remove a block and `cell + normal` to
//! place one against the hit face.

use glam::{IVec3, Vec3};
use tessera_voxel::{Occupancy, VoxelMarch};

/// A ray through the voxel grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelRay {
    /// World-space origin.
    pub origin: Vec3,
    /// Direction (normalized internally; any non-zero length works).
    pub direction: Vec3,
    /// Maximum distance in voxels.
    pub max_distance: f32,
}

impl VoxelRay {
    /// Creates a ray.
    pub fn new(origin: Vec3, direction: Vec3, max_distance: f32) -> Self {
        Self {
            origin,
            direction,
            max_distance,
        }
    }
}

/// Result of a successful voxel raycast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelRaycastHit {
    /// The occupied cell that was hit.
    pub cell: IVec3,
    /// Distance from the origin to the hit point.
    pub distance: f32,
    /// `origin + direction * distance`.
    pub hit_point: Vec3,
    /// Normal of the entered face, pointing back toward the origin.
    /// `None` when the origin cell itself is occupied.
    pub normal: Option<IVec3>,
}

impl VoxelRaycastHit {
    /// Cell adjacent to the hit face, where a new block would be placed.
    ///
    /// `None` when the ray started inside geometry.
    pub fn placement_cell(&self) -> Option<IVec3> {
        self.normal.map(|n| self.cell + n)
    }
}

/// Casts a ray and returns the first occupied cell within `max_distance`.
///
/// A ray that starts inside an occupied cell reports that cell at distance
/// `0` with no normal. A zero-length direction never hits.
pub fn voxel_raycast(ray: &VoxelRay, world: &impl Occupancy) -> Option<VoxelRaycastHit> {
    let march = VoxelMarch::new(ray.origin, ray.direction, ray.max_distance)?;
    let direction = march.direction();

    for step in march {
        if world.is_occupied(step.cell) {
            return Some(VoxelRaycastHit {
                cell: step.cell,
                distance: step.distance,
                hit_point: ray.origin + direction * step.distance,
                normal: step.entry_normal(),
            });
        }
    }
    None
}
