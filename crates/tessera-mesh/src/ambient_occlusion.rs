//! Per-vertex voxel ambient occlusion following the Mikola Lysenko algorithm.
//!
//! Each face has 4 vertices; for each vertex, three neighbouring cells (two
//! edge neighbours and one diagonal) are checked to compute an occlusion
//! count 0–3, which maps to a brightness multiplier.

use glam::IVec3;
use tessera_voxel::Occupancy;

use crate::face_direction::FaceDirection;

/// Shading multipliers for one face, in vertex winding order.
pub type FaceShade = [f32; 4];

/// Shading multipliers for all six faces, indexed by [`FaceDirection::index`].
pub type BlockShade = [FaceShade; 6];

/// Brightness curve for occlusion counts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AoSettings {
    /// Darkening per occluding neighbour.
    pub step: f32,
    /// Floor on the multiplier.
    pub min_shade: f32,
}

impl Default for AoSettings {
    fn default() -> Self {
        Self {
            step: 0.12,
            min_shade: 0.55,
        }
    }
}

impl AoSettings {
    /// Multiplier for an occlusion count: `max(min_shade, 1 - count * step)`.
    pub fn shade(&self, count: u8) -> f32 {
        (1.0 - f32::from(count) * self.step).max(self.min_shade)
    }
}

/// Neighbour offsets for a single vertex's AO calculation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAoOffsets {
    /// Edge neighbour along the first tangent.
    pub side1: IVec3,
    /// Edge neighbour along the second tangent.
    pub side2: IVec3,
    /// Diagonal neighbour.
    pub corner: IVec3,
}

/// Compute the occlusion count for a single vertex.
///
/// Returns a value in `0..=3`. When both edge neighbours are solid the
/// corner is ignored and the count is 3.
pub fn vertex_ao(side1: bool, side2: bool, corner: bool) -> u8 {
    if side1 && side2 {
        3
    } else {
        u8::from(side1) + u8::from(side2) + u8::from(corner)
    }
}

/// Determine whether to flip the quad diagonal based on vertex shades.
///
/// Returns `true` when splitting along vertices 1–3 interpolates more evenly
/// than the default 0–2 split.
pub fn should_flip_ao_diagonal(shade: FaceShade) -> bool {
    shade[0] + shade[2] < shade[1] + shade[3]
}

/// Returns the neighbour offsets for the four vertices of a face, relative
/// to the block's own cell.
pub fn face_ao_offsets(direction: FaceDirection) -> [VertexAoOffsets; 4] {
    let frame = direction.frame();
    frame.corners.map(|(su, sv)| {
        let du = frame.u * su;
        let dv = frame.v * sv;
        VertexAoOffsets {
            side1: frame.normal + du,
            side2: frame.normal + dv,
            corner: frame.normal + du + dv,
        }
    })
}

/// Occlusion counts for the four vertices of one face of `cell`.
pub fn face_ao(world: &impl Occupancy, cell: IVec3, direction: FaceDirection) -> [u8; 4] {
    face_ao_offsets(direction).map(|o| {
        vertex_ao(
            world.is_occupied(cell + o.side1),
            world.is_occupied(cell + o.side2),
            world.is_occupied(cell + o.corner),
        )
    })
}

/// Shading multipliers for the four vertices of one face of `cell`.
pub fn face_shades(
    world: &impl Occupancy,
    cell: IVec3,
    direction: FaceDirection,
    settings: &AoSettings,
) -> FaceShade {
    face_ao(world, cell, direction).map(|count| settings.shade(count))
}

/// Shading multipliers for all six faces of `cell`.
pub fn compute_all(world: &impl Occupancy, cell: IVec3, settings: &AoSettings) -> BlockShade {
    FaceDirection::ALL.map(|face| face_shades(world, cell, face, settings))
}
