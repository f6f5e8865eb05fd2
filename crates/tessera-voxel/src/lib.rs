//! Sparse voxel occupancy, range scans, and grid ray marching.

pub mod events;
pub mod march;
pub mod scanner;
pub mod store;

pub use events::{EditKind, VoxelEdit, VoxelEditBuffer, move_voxel, place_voxel, remove_voxel};
pub use march::{
    Axis, MAX_MARCH_DISTANCE, MarchStep, VoxelMarch, march_segment, max_iterations,
};
pub use scanner::{CellRange, any_in_range, collect_in_range, for_each_in_range};
pub use store::{Occupancy, VoxelStore};
