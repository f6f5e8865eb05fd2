//! Block shading: per-vertex ambient occlusion, its invalidation cache, and
//! see-through occlusion of blocks hiding a subject from the camera.

pub mod ambient_occlusion;
pub mod ao_cache;
pub mod face_direction;
pub mod see_through;

pub use ambient_occlusion::{
    AoSettings, BlockShade, FaceShade, VertexAoOffsets, compute_all, face_ao, face_ao_offsets,
    face_shades, should_flip_ao_diagonal, vertex_ao,
};
pub use ao_cache::AoCache;
pub use face_direction::{FaceDirection, FaceFrame};
pub use see_through::{OcclusionCone, OcclusionMap, OcclusionSampler, compute_occlusion};
