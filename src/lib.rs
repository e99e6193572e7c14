#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Stream
//!
//! The world core of a voxel engine: chunked block storage, greedy meshing, octree ray
//! picking and a multi-threaded pipeline that streams chunks in and out around a moving
//! camera.
//!
//! ## Key Modules
//!
//! * `core` - Shared-ownership primitives used across threads
//! * `engine_state` - Voxels, spatial indices, meshing, camera and task management
//! * `config` - JSON configuration with defaults for every field
//! * `error` - Errors surfaced while setting the engine up
//!
//! ## Architecture
//!
//! The crate never touches a graphics API. Finished meshes leave through the
//! [`RenderSink`](engine_state::rendering::RenderSink) trait, and terrain comes in
//! through [`TerrainSource`](engine_state::voxels::terrain::TerrainSource). Between the
//! two, a [`ChunkManager`](engine_state::voxels::chunk_manager::ChunkManager) runs load,
//! mesh and block-update workers against a fixed pool of chunks.
//!
//! ## Usage
//!
//! ```rust,no_run
//! fn main() {
//!     voxel_stream::run().unwrap();
//! }
//! ```

use std::{env, sync::Arc, thread, time::Duration};

use cgmath::{Deg, Point3, Rad};
use log::info;
use web_time::Instant;

pub mod config;
pub mod core;
pub mod engine_state;
pub mod error;

use config::EngineConfig;
use engine_state::{
    camera_state::camera::{Camera, CameraView, Projection},
    rendering::render_sink::CountingRenderSink,
    voxels::{block::block_type::BlockType, chunk_manager::ChunkManager, terrain::PerlinTerrain},
};
use error::EngineError;

/// Environment variable naming a JSON config file for [`run`].
pub const CONFIG_ENV: &str = "VOXEL_STREAM_CONFIG";

const DEMO_FRAMES: u32 = 600;
const FRAME_TIME: Duration = Duration::from_millis(16);
/// Blocks travelled per frame.
const CAMERA_SPEED: f32 = 0.5;
const EDIT_INTERVAL: u32 = 20;
const LOG_INTERVAL: u32 = 60;

/// Installs an `env_logger` writing to stdout, filtered by `RUST_LOG`.
///
/// Safe to call more than once; only the first call installs the logger.
pub fn init_logging() {
    let _ = env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .try_init();
}

/// Headless demo: flies a camera across Perlin terrain for a few seconds, editing
/// blocks under the crosshair and logging pipeline statistics.
///
/// Reads its configuration from the file named by [`CONFIG_ENV`] when set.
pub fn run() -> Result<(), EngineError> {
    init_logging();
    info!("Logger initialized");

    let config = match env::var_os(CONFIG_ENV) {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    let terrain = Arc::new(PerlinTerrain::new(&config.terrain));
    let mut manager = ChunkManager::new(config, terrain, CountingRenderSink::new())?;

    let projection = Projection::new(1280, 720, Deg(70.0), 0.1, 500.0);
    let mut camera = Camera::new(Point3::new(0.0, 24.0, 0.0), Deg(0.0), Deg(-25.0));
    let start = Instant::now();
    let mut draws = Vec::new();

    for frame in 0..DEMO_FRAMES {
        camera.translate(CAMERA_SPEED, 0.0, 0.0);
        camera.rotate(Rad(0.002), Rad(0.0));
        let view = CameraView::from_camera(&camera, &projection);

        let summary = manager.update(&view);
        draws.clear();
        let drawn = manager.render_chunks(&mut draws, &(), &view);

        if frame % EDIT_INTERVAL == 0 {
            if let Some(pick) = manager.find_block_on_ray(view.position(), camera.forward()) {
                match pick.placement_position() {
                    Some(target) if fastrand::bool() => {
                        manager.add_block(target, BlockType::get_random_type());
                    }
                    _ => {
                        manager.remove_block(pick.block);
                    }
                }
            }
        }

        if frame % LOG_INTERVAL == 0 {
            info!(
                "Frame {frame}: camera {:?}, {drawn} chunks drawn, {} reassigned, {} uploaded",
                camera.position, summary.chunks_reassigned, summary.meshes_uploaded
            );
        }
        thread::sleep(FRAME_TIME);
    }

    info!(
        "Demo finished in {:?}: {:?}, {} indices resident, {} bytes uploaded",
        start.elapsed(),
        manager.stats(),
        manager.sink().total_indices(),
        manager.sink().bytes_uploaded
    );
    manager.shutdown();
    Ok(())
}
