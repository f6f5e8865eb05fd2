//! Domain settings derived from [`Config`].
//!
//! The algorithm crates never see `tessera-config`; this module is the one
//! place where config sections become their runtime types.

use tessera_config::Config;
use tessera_mesh::{AoSettings, OcclusionCone};
use tessera_physics::{DEFAULT_GRAVITY, MAX_CLIENT_DT};
use tessera_voxel::MAX_MARCH_DISTANCE;

/// Block picking parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickSettings {
    /// Reach of the pick ray. Always finite, positive and no longer than
    /// [`MAX_MARCH_DISTANCE`] when built from a [`Config`].
    pub max_distance: f32,
}

impl Default for PickSettings {
    fn default() -> Self {
        Self { max_distance: 32.0 }
    }
}

/// Simulation parameters for bodies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsSettings {
    /// Downward acceleration.
    pub gravity: f32,
    /// Frame deltas are clamped to this before stepping.
    pub max_frame_dt: f32,
    /// Tick length used by [`VoxelScene::advance`](crate::VoxelScene::advance).
    /// Never longer than `max_frame_dt` when built from a [`Config`].
    pub fixed_dt: f32,
    /// Cap on downward speed.
    pub terminal_velocity: f32,
    /// Half extent on X of bodies spawned with
    /// [`VoxelScene::spawn_default_body`](crate::VoxelScene::spawn_default_body).
    pub half_width: f32,
    /// Half extent on Z of default bodies.
    pub half_depth: f32,
    /// Full height of default bodies, measured up from the feet.
    pub height: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            max_frame_dt: MAX_CLIENT_DT,
            fixed_dt: MAX_CLIENT_DT,
            terminal_velocity: 50.0,
            half_width: 0.3,
            half_depth: 0.3,
            height: 1.6,
        }
    }
}

/// Everything a [`VoxelScene`](crate::VoxelScene) needs to run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneSettings {
    /// Body simulation and tick scheduling.
    pub physics: PhysicsSettings,
    /// `None` disables per-vertex AO; every vertex is then fully lit.
    pub ambient_occlusion: Option<AoSettings>,
    /// `None` disables see-through occlusion.
    pub occlusion: Option<OcclusionCone>,
    /// Height of a body's centre above its feet for occlusion sampling.
    pub subject_offset_y: f32,
    /// Reach of [`VoxelScene::pick`](crate::VoxelScene::pick).
    pub picking: PickSettings,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SceneSettings {
    fn from(config: &Config) -> Self {
        let physics = &config.physics;
        let ao = &config.ambient_occlusion;
        let occ = &config.occlusion;

        Self {
            physics: PhysicsSettings {
                gravity: physics.gravity,
                max_frame_dt: physics.max_frame_dt,
                fixed_dt: physics.fixed_dt.min(physics.max_frame_dt),
                terminal_velocity: physics.terminal_velocity,
                half_width: physics.half_width,
                half_depth: physics.half_depth,
                height: physics.height,
            },
            ambient_occlusion: ao.enabled.then_some(AoSettings {
                step: ao.step,
                min_shade: ao.min_shade,
            }),
            occlusion: occ.enabled.then_some(OcclusionCone {
                radius: occ.radius,
                height: occ.height,
                samples_per_ring: occ.samples_per_ring,
                rings: occ.rings,
                height_steps: occ.height_steps,
                base_alpha: occ.base_alpha,
                fade_distance: occ.fade_distance,
            }),
            subject_offset_y: occ.subject_offset_y,
            picking: PickSettings {
                max_distance: pick_reach(config.picking.max_distance),
            },
        }
    }
}

/// Keeps the pick ray bounded: unusable reaches fall back to the default and
/// anything past the march cap is shortened to it.
fn pick_reach(max_distance: f32) -> f32 {
    if max_distance.is_nan() || max_distance <= 0.0 {
        let fallback = PickSettings::default().max_distance;
        tracing::warn!(max_distance, fallback, "invalid pick reach, using default");
        return fallback;
    }
    if max_distance > MAX_MARCH_DISTANCE {
        tracing::warn!(max_distance, cap = MAX_MARCH_DISTANCE, "pick reach clamped");
        return MAX_MARCH_DISTANCE;
    }
    max_distance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_match_domain_defaults() {
        let settings = SceneSettings::default();
        assert_eq!(settings.physics, PhysicsSettings::default());
        assert_eq!(settings.ambient_occlusion, Some(AoSettings::default()));
        assert_eq!(settings.occlusion, Some(OcclusionCone::default()));
        assert_eq!(settings.picking, PickSettings::default());
        assert_eq!(settings.subject_offset_y, 0.9);
    }

    #[test]
    fn test_disabled_sections_become_none() {
        let mut config = Config::default();
        config.ambient_occlusion.enabled = false;
        config.occlusion.enabled = false;
        let settings = SceneSettings::from(&config);
        assert!(settings.ambient_occlusion.is_none());
        assert!(settings.occlusion.is_none());
    }

    #[test]
    fn test_config_values_flow_through() {
        let mut config = Config::default();
        config.physics.gravity = 9.8;
        config.occlusion.rings = 4;
        config.picking.max_distance = 5.0;
        let settings = SceneSettings::from(&config);
        assert_eq!(settings.physics.gravity, 9.8);
        assert_eq!(settings.occlusion.map(|c| c.rings), Some(4));
        assert_eq!(settings.picking.max_distance, 5.0);
    }

    #[test]
    fn test_pick_reach_is_bounded() {
        let mut config = Config::default();
        for (raw, expected) in [
            (f32::INFINITY, MAX_MARCH_DISTANCE),
            (1.0e9, MAX_MARCH_DISTANCE),
            (f32::NAN, 32.0),
            (0.0, 32.0),
            (-4.0, 32.0),
            (100.0, 100.0),
        ] {
            config.picking.max_distance = raw;
            let settings = SceneSettings::from(&config);
            assert_eq!(settings.picking.max_distance, expected, "reach {raw}");
        }
    }

    #[test]
    fn test_fixed_tick_never_exceeds_frame_clamp() {
        let mut config = Config::default();
        config.physics.max_frame_dt = 1.0 / 30.0;
        config.physics.fixed_dt = 0.1;
        let settings = SceneSettings::from(&config);
        assert_eq!(settings.physics.fixed_dt, 1.0 / 30.0);

        config.physics.fixed_dt = 1.0 / 60.0;
        let settings = SceneSettings::from(&config);
        assert_eq!(settings.physics.fixed_dt, 1.0 / 60.0, "shorter ticks are kept");
    }
}
