//! Voxel physics: box colliders, swept collision resolution, gravity, and
//! first-hit raycasting against the occupancy grid.
//!
//! Everything here is synchronous and allocation-free per call. The voxel
//! store is borrowed, never copied, so the caller must not mutate it while a
//! resolve or raycast is in progress.

pub mod body;
pub mod gravity;
pub mod voxel_collision;
pub mod voxel_raycast;

pub use body::Body;
pub use gravity::{DEFAULT_GRAVITY, MAX_CLIENT_DT, apply_gravity, clamp_frame_dt};
pub use voxel_collision::{AXIS_ORDER, Contacts, SKIN_EPSILON, SweptCollisionResolver, overlaps_any};
pub use voxel_raycast::{VoxelRay, VoxelRaycastHit, voxel_raycast};
