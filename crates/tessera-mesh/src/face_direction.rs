//! The six block faces and their canonical shading frames.

use glam::IVec3;

/// One of the six faces of a voxel.
///
/// The `repr(u8)` discriminant is the face's index in per-face arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FaceDirection {
    /// +X face.
    PosX = 0,
    /// −X face.
    NegX = 1,
    /// +Y (top) face.
    PosY = 2,
    /// −Y (bottom) face.
    NegY = 3,
    /// +Z face.
    PosZ = 4,
    /// −Z face.
    NegZ = 5,
}

/// Shading frame of a face: the normal used for neighbour sampling, the two
/// tangent axes spanning the face, and the tangent signs of its four
/// vertices in winding order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceFrame {
    /// Sampling normal from the canonical table.
    pub normal: IVec3,
    /// First tangent axis (unit vector).
    pub u: IVec3,
    /// Second tangent axis (unit vector).
    pub v: IVec3,
    /// `(sign_u, sign_v)` per vertex, each `±1`.
    pub corners: [(i32, i32); 4],
}

/// Vertex winding shared by every face.
const WINDING: [(i32, i32); 4] = [(-1, -1), (1, -1), (1, 1), (-1, 1)];

impl FaceDirection {
    /// All six faces in index order.
    pub const ALL: [FaceDirection; 6] = [
        Self::PosX,
        Self::NegX,
        Self::PosY,
        Self::NegY,
        Self::PosZ,
        Self::NegZ,
    ];

    /// Geometric outward direction, used for neighbour culling.
    pub fn outward(self) -> IVec3 {
        match self {
            Self::PosX => IVec3::X,
            Self::NegX => IVec3::NEG_X,
            Self::PosY => IVec3::Y,
            Self::NegY => IVec3::NEG_Y,
            Self::PosZ => IVec3::Z,
            Self::NegZ => IVec3::NEG_Z,
        }
    }

    /// Canonical shading frame.
    ///
    /// The Y entries carry swapped normals: the top face samples the layer
    /// below the block and the bottom face the layer above. Shading output
    /// depends on this mapping, so it must not be "corrected" here.
    pub fn frame(self) -> FaceFrame {
        let (normal, u, v) = match self {
            Self::PosX => (IVec3::X, IVec3::Z, IVec3::Y),
            Self::NegX => (IVec3::NEG_X, IVec3::Z, IVec3::Y),
            Self::PosY => (IVec3::NEG_Y, IVec3::X, IVec3::Z),
            Self::NegY => (IVec3::Y, IVec3::X, IVec3::Z),
            Self::PosZ => (IVec3::Z, IVec3::X, IVec3::Y),
            Self::NegZ => (IVec3::NEG_Z, IVec3::X, IVec3::Y),
        };
        FaceFrame {
            normal,
            u,
            v,
            corners: WINDING,
        }
    }

    /// Neighbour coordinate across this face.
    pub fn neighbor(self, cell: IVec3) -> IVec3 {
        cell + self.outward()
    }

    /// Returns the opposite face.
    pub fn opposite(self) -> Self {
        match self {
            Self::PosX => Self::NegX,
            Self::NegX => Self::PosX,
            Self::PosY => Self::NegY,
            Self::NegY => Self::PosY,
            Self::PosZ => Self::NegZ,
            Self::NegZ => Self::PosZ,
        }
    }

    /// Returns the face index (0–5).
    pub fn index(self) -> usize {
        self as usize
    }
}
