//! Swept AABB collision against the voxel lattice.
//!
//! Motion is integrated one axis at a time in the fixed order X, Z, Y. Each
//! axis sees the position already resolved on the axes before it, so a
//! body landing on a ledge is tested at its corrected horizontal position and
//! diagonal motion into an interior corner is stopped on both walls.

use glam::Vec3;
use tessera_voxel::{Axis, Occupancy, for_each_in_range};

use crate::body::Body;

/// Inward inset applied to the axes orthogonal to the one being swept.
///
/// Keeps a body resting flush on a face from registering the cells that
/// only share an edge or corner with it.
pub const SKIN_EPSILON: f32 = 1e-4;

/// Axis resolution order. Part of the behavioural contract.
pub const AXIS_ORDER: [Axis; 3] = [Axis::X, Axis::Z, Axis::Y];

/// Which axes were stopped by a voxel during one resolve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Contacts {
    /// Motion on X was clamped.
    pub x: bool,
    /// Motion on Y was clamped (up or down).
    pub y: bool,
    /// Motion on Z was clamped.
    pub z: bool,
}

impl Contacts {
    fn set(&mut self, axis: Axis) {
        match axis {
            Axis::X => self.x = true,
            Axis::Y => self.y = true,
            Axis::Z => self.z = true,
        }
    }

    /// Returns `true` if any axis was clamped.
    pub fn any(&self) -> bool {
        self.x || self.y || self.z
    }
}

/// Integrates a [`Body`] against occupied voxels without tunnelling.
#[derive(Clone, Copy, Debug)]
pub struct SweptCollisionResolver {
    /// Orthogonal-axis inset, see [`SKIN_EPSILON`].
    pub skin: f32,
}

impl Default for SweptCollisionResolver {
    fn default() -> Self {
        Self { skin: SKIN_EPSILON }
    }
}

impl SweptCollisionResolver {
    /// Creates a resolver with the standard skin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves `body` by `velocity * dt`, clamping against occupied cells.
    ///
    /// `body.velocity` must already include this tick's gravity. `grounded`
    /// is cleared first and set only by a downward Y collision. Clamped
    /// axes have their velocity zeroed. Non-finite input is left untouched.
    pub fn resolve(&self, world: &impl Occupancy, body: &mut Body, dt: f32) -> Contacts {
        body.grounded = false;
        let mut contacts = Contacts::default();

        if !body.is_finite() || !dt.is_finite() {
            tracing::warn!(position = ?body.position, velocity = ?body.velocity, dt, "skipping non-finite body");
            return contacts;
        }

        for axis in AXIS_ORDER {
            if self.resolve_axis(world, body, axis, dt) {
                contacts.set(axis);
            }
        }
        contacts
    }

    /// Sweeps one axis. Returns `true` if a voxel stopped the motion.
    fn resolve_axis(&self, world: &impl Occupancy, body: &mut Body, axis: Axis, dt: f32) -> bool {
        let i = axis.index();
        let velocity = body.velocity[i];
        if velocity == 0.0 {
            return false;
        }

        let next = body.position[i] + velocity * dt;
        let (below, above) = extents(body, axis);

        let mut min = Vec3::ZERO;
        let mut max = Vec3::ZERO;
        for other in [Axis::X, Axis::Y, Axis::Z] {
            let j = other.index();
            if other == axis {
                min[j] = next - below;
                max[j] = next + above;
            } else {
                let (lo, hi) = extents(body, other);
                min[j] = body.position[j] - lo + self.skin;
                max[j] = body.position[j] + hi - self.skin;
            }
        }

        // Nearest blocking lattice coordinate in the direction of travel.
        let mut blocking: Option<i32> = None;
        for_each_in_range(world, min, max, |cell| {
            let c = cell[i];
            blocking = Some(match blocking {
                None => c,
                Some(b) if velocity > 0.0 => b.min(c),
                Some(b) => b.max(c),
            });
        });

        let Some(coord) = blocking else {
            body.position[i] = next;
            return false;
        };

        body.position[i] = if velocity > 0.0 {
            next.min(coord as f32 - above)
        } else {
            next.max(coord as f32 + 1.0 + below)
        };
        body.velocity[i] = 0.0;

        if axis == Axis::Y && velocity < 0.0 {
            body.grounded = true;
        }
        true
    }
}

/// Extent of the body below and above its anchor on `axis`.
fn extents(body: &Body, axis: Axis) -> (f32, f32) {
    match axis {
        Axis::X => (body.half_width, body.half_width),
        Axis::Z => (body.half_depth, body.half_depth),
        Axis::Y => (0.0, body.height),
    }
}

/// Returns `true` if the body's box, shrunk by `skin` on every side,
/// overlaps any occupied cell.
pub fn overlaps_any(world: &impl Occupancy, body: &Body, skin: f32) -> bool {
    tessera_voxel::any_in_range(world, body.min() + Vec3::splat(skin), body.max() - Vec3::splat(skin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;
    use tessera_voxel::VoxelStore;

    const DT: f32 = 1.0 / 30.0;

    fn floor(radius: i32) -> VoxelStore {
        let mut store = VoxelStore::new();
        for x in -radius..=radius {
            for z in -radius..=radius {
                store.add(IVec3::new(x, 0, z));
            }
        }
        store
    }

    fn fall_step(resolver: &SweptCollisionResolver, store: &VoxelStore, body: &mut Body) {
        body.velocity.y -= 18.0 * DT;
        resolver.resolve(store, body, DT);
    }

    #[test]
    fn test_falling_body_never_penetrates_floor() {
        let store = floor(3);
        let resolver = SweptCollisionResolver::new();
        let mut body = Body::new(Vec3::new(0.5, 6.0, 0.5), 0.3, 0.3, 1.8);

        for tick in 0..120 {
            fall_step(&resolver, &store, &mut body);
            assert!(
                body.position.y >= 1.0,
                "tick {tick}: body sank into floor, y={}",
                body.position.y
            );
            assert!(!overlaps_any(&store, &body, SKIN_EPSILON));
        }
        assert_eq!(body.position.y, 1.0);
        assert!(body.grounded, "resting body must be grounded");
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_large_step_lands_on_floor() {
        let store = floor(1);
        let resolver = SweptCollisionResolver::new();
        // One tick carries the feet three units down, to the floor's base.
        let mut body = Body::new(Vec3::new(0.5, 3.0, 0.5), 0.4, 0.4, 1.0)
            .with_velocity(Vec3::new(0.0, -90.0, 0.0));

        let contacts = resolver.resolve(&store, &mut body, DT);
        assert!(contacts.y);
        assert_eq!(body.position.y, 1.0);
        assert!(body.grounded);
    }

    #[test]
    fn test_interior_corner_stops_both_axes() {
        let mut store = VoxelStore::new();
        store.add(IVec3::new(1, 0, 0));
        store.add(IVec3::new(0, 0, 1));

        let resolver = SweptCollisionResolver::new();
        let mut body = Body::new(Vec3::new(2.0, 0.0, 2.0), 0.5, 0.5, 1.5)
            .with_velocity(Vec3::new(-3.0, 0.0, -3.0));

        for tick in 0..30 {
            resolver.resolve(&store, &mut body, DT);
            assert!(
                body.position.x >= 1.5 - 1e-5 && body.position.z >= 1.5 - 1e-5,
                "tick {tick}: body slipped into the corner gap at {:?}",
                body.position
            );
            assert!(!overlaps_any(&store, &body, SKIN_EPSILON));
        }
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(body.velocity.z, 0.0);
        assert!(!body.grounded);
    }

    #[test]
    fn test_single_wall_slides_along_open_axis() {
        let mut store = VoxelStore::new();
        store.add(IVec3::new(0, 0, 1));

        let resolver = SweptCollisionResolver::new();
        let mut body = Body::new(Vec3::new(2.0, 0.0, 2.0), 0.5, 0.5, 1.5)
            .with_velocity(Vec3::new(-3.0, 0.0, -3.0));

        for _ in 0..20 {
            resolver.resolve(&store, &mut body, DT);
        }
        assert_eq!(body.velocity.x, 0.0, "wall stops X");
        assert_eq!(body.position.x, 1.5);
        assert_eq!(body.velocity.z, -3.0, "Z keeps sliding");
        assert!(body.position.z < 1.0, "slid past the wall, z={}", body.position.z);
    }

    #[test]
    fn test_horizontal_hit_does_not_ground() {
        let mut store = VoxelStore::new();
        store.add(IVec3::new(2, 0, 0));

        let resolver = SweptCollisionResolver::new();
        let mut body = Body::new(Vec3::new(1.4, 0.0, 0.5), 0.5, 0.5, 1.5)
            .with_velocity(Vec3::new(4.0, 0.0, 0.0));

        let contacts = resolver.resolve(&store, &mut body, DT);
        assert!(contacts.x);
        assert!(!contacts.y);
        assert_eq!(body.position.x, 1.5);
        assert_eq!(body.velocity.x, 0.0);
        assert!(!body.grounded, "wall contact alone must not ground the body");
    }

    #[test]
    fn test_walking_into_wall_on_floor_stays_grounded() {
        let mut store = floor(4);
        store.add(IVec3::new(2, 1, 0));

        let resolver = SweptCollisionResolver::new();
        let mut body = Body::new(Vec3::new(0.5, 1.0, 0.5), 0.5, 0.5, 1.5);

        for _ in 0..30 {
            body.velocity.x = 4.0;
            fall_step(&resolver, &store, &mut body);
        }
        assert_eq!(body.position.x, 1.5);
        assert_eq!(body.position.y, 1.0);
        assert!(body.grounded);
    }

    #[test]
    fn test_grounded_is_cleared_each_resolve() {
        let store = floor(1);
        let resolver = SweptCollisionResolver::new();
        let mut body = Body::new(Vec3::new(0.5, 1.0, 0.5), 0.3, 0.3, 1.8);

        fall_step(&resolver, &store, &mut body);
        assert!(body.grounded);

        // No vertical motion: the Y axis is skipped and nothing grounds it.
        resolver.resolve(&store, &mut body, DT);
        assert!(!body.grounded);
    }

    #[test]
    fn test_ceiling_clamps_head() {
        let mut store = VoxelStore::new();
        store.add(IVec3::new(0, 3, 0));

        let resolver = SweptCollisionResolver::new();
        let mut body = Body::new(Vec3::new(0.5, 1.2, 0.5), 0.3, 0.3, 1.5)
            .with_velocity(Vec3::new(0.0, 12.0, 0.0));

        let contacts = resolver.resolve(&store, &mut body, DT);
        assert!(contacts.y);
        assert!((body.position.y - 1.5).abs() < 1e-6);
        assert_eq!(body.velocity.y, 0.0);
        assert!(!body.grounded, "upward contact never grounds");
    }

    #[test]
    fn test_flush_body_moves_freely_along_floor() {
        let store = floor(5);
        let resolver = SweptCollisionResolver::new();
        let mut body = Body::new(Vec3::new(0.5, 1.0, 0.5), 0.5, 0.5, 1.5)
            .with_velocity(Vec3::new(3.0, 0.0, -2.0));

        let contacts = resolver.resolve(&store, &mut body, DT);
        assert!(!contacts.any(), "flush contact with floor edges must not block");
        assert!((body.position.x - 0.6).abs() < 1e-5);
        assert!((body.position.z - (0.5 - 2.0 / 30.0)).abs() < 1e-5);
    }

    #[test]
    fn test_zero_velocity_axis_is_skipped() {
        let mut store = VoxelStore::new();
        store.add(IVec3::ZERO);

        let resolver = SweptCollisionResolver::new();
        // Embedded in a voxel but not moving: nothing is corrected.
        let mut body = Body::new(Vec3::new(0.5, 0.2, 0.5), 0.3, 0.3, 0.5);
        let contacts = resolver.resolve(&store, &mut body, DT);
        assert!(!contacts.any());
        assert_eq!(body.position, Vec3::new(0.5, 0.2, 0.5));
    }

    #[test]
    fn test_non_finite_body_is_left_alone() {
        let store = floor(1);
        let resolver = SweptCollisionResolver::new();
        let mut body = Body::new(Vec3::new(0.5, f32::NAN, 0.5), 0.3, 0.3, 1.8)
            .with_velocity(Vec3::NEG_Y);
        let contacts = resolver.resolve(&store, &mut body, DT);
        assert!(!contacts.any());
        assert!(!body.grounded);
    }

    #[test]
    fn test_settles_on_single_voxel() {
        let mut store = VoxelStore::new();
        store.add(IVec3::new(2, 0, 2));

        let resolver = SweptCollisionResolver::new();
        let mut body = Body::new(Vec3::new(2.5, 5.0, 2.5), 0.5, 0.5, 1.5);

        for tick in 0..60 {
            fall_step(&resolver, &store, &mut body);
            assert!(body.position.y >= 1.0, "tick {tick}: y={}", body.position.y);
        }
        assert_eq!(body.position.y, 1.0);
        assert!(body.grounded);
        assert_eq!(body.velocity.y, 0.0);
    }
}
