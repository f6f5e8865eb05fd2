//! Configuration structs with tuned defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APP_NAME: &str = "tessera";
const CONFIG_FILE: &str = "config.ron";

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Gravity, frame clamping, and default body dimensions.
    pub physics: PhysicsConfig,
    /// See-through occlusion cone.
    pub occlusion: OcclusionConfig,
    /// Per-vertex ambient occlusion curve.
    pub ambient_occlusion: AmbientOcclusionConfig,
    /// Block picking.
    pub picking: PickingConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Physics configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in units/s².
    pub gravity: f32,
    /// Largest frame delta fed to the simulation, in seconds.
    pub max_frame_dt: f32,
    /// Fixed tick length used by server-style stepping, in seconds.
    pub fixed_dt: f32,
    /// Cap on downward speed in units/s.
    pub terminal_velocity: f32,
    /// Default body half-extent on X.
    pub half_width: f32,
    /// Default body half-extent on Z.
    pub half_depth: f32,
    /// Default body height above its feet.
    pub height: f32,
}

/// See-through occlusion configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OcclusionConfig {
    /// Outer ring radius around the subject centre.
    pub radius: f32,
    /// Vertical extent of the sample heights.
    pub height: f32,
    /// Angular samples per ring.
    pub samples_per_ring: u32,
    /// Number of rings.
    pub rings: u32,
    /// Number of sample heights.
    pub height_steps: u32,
    /// Alpha applied by a full-weight ray.
    pub base_alpha: f32,
    /// Falloff distance from the sample point (0 disables).
    pub fade_distance: f32,
    /// Height of the subject centre above its feet.
    pub subject_offset_y: f32,
    /// Compute occlusion maps at all.
    pub enabled: bool,
}

/// Ambient occlusion configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AmbientOcclusionConfig {
    /// Darkening per occluding neighbour.
    pub step: f32,
    /// Floor on the shade multiplier.
    pub min_shade: f32,
    /// When false every vertex is fully lit.
    pub enabled: bool,
}

/// Picking configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PickingConfig {
    /// Reach of the pick ray.
    pub max_distance: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 18.0,
            max_frame_dt: 1.0 / 30.0,
            fixed_dt: 1.0 / 30.0,
            terminal_velocity: 50.0,
            half_width: 0.3,
            half_depth: 0.3,
            height: 1.6,
        }
    }
}

impl Default for OcclusionConfig {
    fn default() -> Self {
        Self {
            radius: 0.6,
            height: 1.6,
            samples_per_ring: 8,
            rings: 2,
            height_steps: 3,
            base_alpha: 0.25,
            fade_distance: 6.0,
            subject_offset_y: 0.9,
            enabled: true,
        }
    }
}

impl Default for AmbientOcclusionConfig {
    fn default() -> Self {
        Self {
            step: 0.12,
            min_shade: 0.55,
            enabled: true,
        }
    }
}

impl Default for PickingConfig {
    fn default() -> Self {
        Self { max_distance: 32.0 }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform configuration directory for tessera, if the OS exposes one.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_NAME))
}

/// Platform directory for log files, falling back to the config directory.
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::data_local_dir()
        .or_else(dirs::config_dir)
        .map(|base| base.join(APP_NAME).join("logs"))
}

// --- Load / Save / Reload ---

impl Config {
    /// Reads `config.ron` from `config_dir`, writing the defaults there first
    /// when it does not exist yet. Out-of-range values are repaired.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        if !path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Wrote default config to {}", path.display());
            return Ok(config);
        }

        let config = Self::read(&path)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Writes the config to `config_dir/config.ron`, creating the directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;
        let path = config_dir.join(CONFIG_FILE);
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new().depth_limit(2))
            .map_err(ConfigError::SerializeError)?;
        std::fs::write(&path, text).map_err(ConfigError::WriteError)?;
        log::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Re-reads the file and returns the new config only if it differs from
    /// `self` after repair.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = Self::read(&config_dir.join(CONFIG_FILE))?;
        if fresh == *self {
            return Ok(None);
        }
        log::info!("Config changed on disk, reloading");
        Ok(Some(fresh))
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let mut config: Config = ron::from_str(&text).map_err(ConfigError::ParseError)?;
        let repaired = config.sanitize();
        if repaired > 0 {
            log::warn!("{repaired} value(s) in {} were out of range", path.display());
        }
        Ok(config)
    }

    /// Replaces values the engine cannot run with by their defaults and caps
    /// `fixed_dt` at `max_frame_dt`. Returns how many fields were changed.
    pub fn sanitize(&mut self) -> usize {
        let physics = PhysicsConfig::default();
        let occlusion = OcclusionConfig::default();
        let ao = AmbientOcclusionConfig::default();
        let picking = PickingConfig::default();

        let p = &mut self.physics;
        let mut repaired = [
            repair("physics.gravity", &mut p.gravity, physics.gravity, f32::is_finite),
            repair("physics.max_frame_dt", &mut p.max_frame_dt, physics.max_frame_dt, positive),
            repair("physics.fixed_dt", &mut p.fixed_dt, physics.fixed_dt, positive),
            repair(
                "physics.terminal_velocity",
                &mut p.terminal_velocity,
                physics.terminal_velocity,
                positive,
            ),
            repair("physics.half_width", &mut p.half_width, physics.half_width, positive),
            repair("physics.half_depth", &mut p.half_depth, physics.half_depth, positive),
            repair("physics.height", &mut p.height, physics.height, positive),
            repair("occlusion.radius", &mut self.occlusion.radius, occlusion.radius, non_negative),
            repair("occlusion.height", &mut self.occlusion.height, occlusion.height, non_negative),
            repair(
                "occlusion.base_alpha",
                &mut self.occlusion.base_alpha,
                occlusion.base_alpha,
                unit,
            ),
            repair(
                "occlusion.fade_distance",
                &mut self.occlusion.fade_distance,
                occlusion.fade_distance,
                non_negative,
            ),
            repair(
                "occlusion.subject_offset_y",
                &mut self.occlusion.subject_offset_y,
                occlusion.subject_offset_y,
                f32::is_finite,
            ),
            repair("ambient_occlusion.step", &mut self.ambient_occlusion.step, ao.step, unit),
            repair(
                "ambient_occlusion.min_shade",
                &mut self.ambient_occlusion.min_shade,
                ao.min_shade,
                unit,
            ),
            repair(
                "picking.max_distance",
                &mut self.picking.max_distance,
                picking.max_distance,
                positive,
            ),
        ]
        .into_iter()
        .filter(|&changed| changed)
        .count();

        let p = &mut self.physics;
        if p.fixed_dt > p.max_frame_dt {
            log::warn!(
                "physics.fixed_dt {} exceeds max_frame_dt, capping to {}",
                p.fixed_dt,
                p.max_frame_dt
            );
            p.fixed_dt = p.max_frame_dt;
            repaired += 1;
        }
        repaired
    }
}

fn repair(name: &str, value: &mut f32, default: f32, valid: fn(f32) -> bool) -> bool {
    if valid(*value) {
        return false;
    }
    log::warn!("{name} = {value} is out of range, using {default}");
    *value = default;
    true
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

fn non_negative(v: f32) -> bool {
    v.is_finite() && v >= 0.0
}

fn unit(v: f32) -> bool {
    (0.0..=1.0).contains(&v)
}
