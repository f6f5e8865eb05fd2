//! Axis-aligned box collider driven by the swept resolver.

use glam::Vec3;

/// A moving box collider anchored at the bottom-centre of its box.
///
/// The box spans `[x - half_width, x + half_width]` on X,
/// `[z - half_depth, z + half_depth]` on Z, and `[y, y + height]` on Y,
/// so `position.y` is the height of the feet.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    /// Bottom-centre of the box in world space.
    pub position: Vec3,
    /// Velocity in world units per second.
    pub velocity: Vec3,
    /// Half extent on X.
    pub half_width: f32,
    /// Half extent on Z.
    pub half_depth: f32,
    /// Extent on Y above `position.y`.
    pub height: f32,
    /// Set only when the last resolve stopped downward motion.
    pub grounded: bool,
}

impl Body {
    /// Creates a body at rest.
    pub fn new(position: Vec3, half_width: f32, half_depth: f32, height: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            half_width,
            half_depth,
            height,
            grounded: false,
        }
    }

    /// Sets the initial velocity.
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Minimum corner of the box.
    pub fn min(&self) -> Vec3 {
        Vec3::new(
            self.position.x - self.half_width,
            self.position.y,
            self.position.z - self.half_depth,
        )
    }

    /// Maximum corner of the box.
    pub fn max(&self) -> Vec3 {
        Vec3::new(
            self.position.x + self.half_width,
            self.position.y + self.height,
            self.position.z + self.half_depth,
        )
    }

    /// Centre of the box (half way up).
    pub fn center(&self) -> Vec3 {
        self.position + Vec3::Y * (self.height * 0.5)
    }

    /// Returns `true` if position and velocity hold only finite values.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extents_from_feet_anchor() {
        let body = Body::new(Vec3::new(2.5, 1.0, -3.0), 0.5, 0.25, 1.5);
        assert_eq!(body.min(), Vec3::new(2.0, 1.0, -3.25));
        assert_eq!(body.max(), Vec3::new(3.0, 2.5, -2.75));
        assert_eq!(body.center(), Vec3::new(2.5, 1.75, -3.0));
    }

    #[test]
    fn test_new_body_is_at_rest_and_airborne() {
        let body = Body::new(Vec3::ZERO, 0.3, 0.3, 1.8).with_velocity(Vec3::X);
        assert_eq!(body.velocity, Vec3::X);
        assert!(!body.grounded);
        assert!(body.is_finite());
    }

    #[test]
    fn test_non_finite_detected() {
        let mut body = Body::new(Vec3::ZERO, 0.3, 0.3, 1.8);
        body.position.y = f32::NAN;
        assert!(!body.is_finite());
    }
}
