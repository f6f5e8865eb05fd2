//! Gravity integration and frame-time clamping for voxel bodies.
//!
//! Gravity is folded into a body's velocity before the swept resolver runs,
//! so the resolver only ever sees the final per-tick velocity.

use crate::body::Body;

/// Default downward acceleration in world units per second squared.
pub const DEFAULT_GRAVITY: f32 = 18.0;

/// Largest frame delta a client should feed the resolver.
pub const MAX_CLIENT_DT: f32 = 1.0 / 30.0;

/// Adds one tick of gravity to `body.velocity.y`.
///
/// Vertical speed is capped at `terminal_velocity` downward. Applied every
/// tick, grounded or not, so a resting body keeps pressing into the floor and
/// the resolver re-grounds it.
pub fn apply_gravity(body: &mut Body, gravity: f32, dt: f32, terminal_velocity: f32) {
    body.velocity.y = (body.velocity.y - gravity * dt).max(-terminal_velocity.abs());
}

/// Clamps a measured frame delta into `[0, max_dt]`.
///
/// Non-finite input collapses to zero so a bad timer reading cannot push NaN
/// into positions.
pub fn clamp_frame_dt(dt: f32, max_dt: f32) -> f32 {
    if !dt.is_finite() {
        tracing::warn!(dt, "non-finite frame delta, treating as zero");
        return 0.0;
    }
    dt.clamp(0.0, max_dt.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_gravity_accumulates() {
        let mut body = Body::new(Vec3::ZERO, 0.3, 0.3, 1.8);
        apply_gravity(&mut body, DEFAULT_GRAVITY, MAX_CLIENT_DT, 50.0);
        apply_gravity(&mut body, DEFAULT_GRAVITY, MAX_CLIENT_DT, 50.0);
        assert!((body.velocity.y + 1.2).abs() < 1e-5, "vy={}", body.velocity.y);
    }

    #[test]
    fn test_terminal_velocity_caps_fall() {
        let mut body = Body::new(Vec3::ZERO, 0.3, 0.3, 1.8);
        for _ in 0..1000 {
            apply_gravity(&mut body, DEFAULT_GRAVITY, MAX_CLIENT_DT, 50.0);
        }
        assert_eq!(body.velocity.y, -50.0);
    }

    #[test]
    fn test_gravity_leaves_horizontal_velocity() {
        let mut body = Body::new(Vec3::ZERO, 0.3, 0.3, 1.8).with_velocity(Vec3::new(2.0, 5.0, -1.0));
        apply_gravity(&mut body, 10.0, 0.1, 50.0);
        assert_eq!(body.velocity.x, 2.0);
        assert_eq!(body.velocity.z, -1.0);
        assert!((body.velocity.y - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_frame_dt() {
        assert_eq!(clamp_frame_dt(0.5, MAX_CLIENT_DT), MAX_CLIENT_DT);
        assert_eq!(clamp_frame_dt(0.01, MAX_CLIENT_DT), 0.01);
        assert_eq!(clamp_frame_dt(-1.0, MAX_CLIENT_DT), 0.0);
        assert_eq!(clamp_frame_dt(f32::NAN, MAX_CLIENT_DT), 0.0);
        assert_eq!(clamp_frame_dt(f32::INFINITY, MAX_CLIENT_DT), 0.0);
    }
}
