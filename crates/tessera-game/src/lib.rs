//! tessera scene facade: owns a voxel world and the bodies in it, and routes
//! block edits, physics ticks, picking, and shading queries through one API.

pub mod error;
pub mod scene;
pub mod settings;

pub use error::SceneError;
pub use scene::{BodyId, BodyLookup, VoxelScene};
pub use settings::{PhysicsSettings, PickSettings, SceneSettings};
