//! Headless tessera demo.
//!
//! Builds a small walled floor, drops a body onto it, and logs where it
//! settles, what a downward pick hits, and how many blocks the see-through
//! pass fades for a camera behind the wall.
//!
//! Run with: `cargo run -p tessera-game -- --log-level debug`

use clap::Parser;
use glam::{IVec3, Vec3};
use tessera_config::{CliArgs, Config, default_config_dir, default_log_dir};
use tessera_game::{SceneError, SceneSettings, VoxelScene};
use tracing::info;

/// Ticks simulated before the settle point is reported.
const SETTLE_TICKS: u32 = 120;

fn main() -> Result<(), SceneError> {
    let args = CliArgs::parse();

    let mut config = match args.config.clone().or_else(default_config_dir) {
        Some(dir) => Config::load_or_create(&dir)?,
        None => Config::default(),
    };
    config.apply_cli_overrides(&args);

    tessera_log::init_logging(
        default_log_dir().as_deref(),
        cfg!(debug_assertions),
        Some(&config),
    );

    info!("tessera voxel demo");
    info!(
        "gravity={} max_frame_dt={:.4} ao={} occlusion={}",
        config.physics.gravity,
        config.physics.max_frame_dt,
        config.ambient_occlusion.enabled,
        config.occlusion.enabled,
    );

    let mut scene = VoxelScene::new(SceneSettings::from(&config));
    build_level(&mut scene);
    info!("level built with {} blocks", scene.store().len());

    let body = scene.spawn_default_body(Vec3::new(2.5, 5.0, 2.5));
    for _ in 0..SETTLE_TICKS {
        scene.step(config.physics.fixed_dt);
    }
    let settled = scene.require_body(body)?;
    info!(
        "body settled at ({:.3}, {:.3}, {:.3}) grounded={}",
        settled.position.x, settled.position.y, settled.position.z, settled.grounded,
    );

    match scene.pick(Vec3::new(4.5, 6.0, 4.5), Vec3::NEG_Y) {
        Some(hit) => info!(
            "pick hit {:?} at distance {:.3}, place at {:?}",
            hit.cell,
            hit.distance,
            hit.placement_cell(),
        ),
        None => info!("pick missed"),
    }

    let viewpoint = Vec3::new(2.5, 2.0, 9.5);
    let faded = scene.occlusion_for(body, viewpoint);
    info!("occlusion map covers {} cells", faded.len());

    let shade = scene.face_shading(IVec3::new(2, 0, 5));
    info!("floor block beside the wall has top-face shading {:?}", shade[2]);

    Ok(())
}

/// An 8×8 floor at y = 0 with a two-high wall across z = 5.
fn build_level(scene: &mut VoxelScene) {
    for x in 0..8 {
        for z in 0..8 {
            scene.place_block(IVec3::new(x, 0, z));
        }
    }
    for x in 0..8 {
        for y in 1..=2 {
            scene.place_block(IVec3::new(x, y, 5));
        }
    }
}
