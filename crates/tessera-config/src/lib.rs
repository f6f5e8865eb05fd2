//! Configuration system for tessera.
//!
//! Provides runtime-configurable settings that persist to disk as RON files.
//! Supports CLI overrides via clap, hot-reload detection, and forward/backward
//! compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AmbientOcclusionConfig, Config, DebugConfig, OcclusionConfig, PhysicsConfig, PickingConfig,
    default_config_dir, default_log_dir,
};
pub use error::ConfigError;
