//! Command-line argument parsing for tessera.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// tessera command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "tessera", about = "Voxel physics and shading sandbox")]
pub struct CliArgs {
    /// Downward acceleration in units/s².
    #[arg(long)]
    pub gravity: Option<f32>,

    /// Largest simulated frame delta in seconds.
    #[arg(long)]
    pub max_frame_dt: Option<f32>,

    /// Reach of the block pick ray.
    #[arg(long)]
    pub pick_distance: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable per-vertex ambient occlusion.
    #[arg(long)]
    pub no_ao: bool,

    /// Disable see-through occlusion.
    #[arg(long)]
    pub no_occlusion: bool,
}

impl Config {
    /// Apply CLI overrides to a loaded config, then repair any value the
    /// overrides pushed out of range.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(g) = args.gravity {
            self.physics.gravity = g;
        }
        if let Some(dt) = args.max_frame_dt {
            self.physics.max_frame_dt = dt;
        }
        if let Some(d) = args.pick_distance {
            self.picking.max_distance = d;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if args.no_ao {
            self.ambient_occlusion.enabled = false;
        }
        if args.no_occlusion {
            self.occlusion.enabled = false;
        }
        self.sanitize();
    }
}
