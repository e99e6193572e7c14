use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use cgmath::{Deg, Point3, Vector3};
use voxel_stream::{
    config::EngineConfig,
    engine_state::{
        camera_state::camera::{Camera, CameraView, Projection},
        rendering::render_sink::{CountingRenderSink, MeshHandle},
        voxels::{
            block::{block_side::BlockSide, block_type::BlockType},
            chunk_manager::ChunkManager,
            terrain::{FlatTerrain, PerlinTerrain, TerrainSource},
        },
    },
};

fn view_at(position: Point3<f32>) -> CameraView {
    let camera = Camera::new(position, Deg(0.0), Deg(-60.0));
    let projection = Projection::new(1024, 768, Deg(80.0), 0.1, 500.0);
    CameraView::from_camera(&camera, &projection)
}

fn settle(manager: &mut ChunkManager<CountingRenderSink>, view: &CameraView) {
    let deadline = Instant::now() + Duration::from_secs(60);
    loop {
        manager.update(view);
        if manager.is_idle() {
            return;
        }
        assert!(
            Instant::now() < deadline,
            "pipeline did not settle: {:?}",
            manager.stats()
        );
        thread::sleep(Duration::from_millis(1));
    }
}

fn start(config: EngineConfig, terrain: Arc<dyn TerrainSource>) -> ChunkManager<CountingRenderSink> {
    voxel_stream::init_logging();
    ChunkManager::new(config, terrain, CountingRenderSink::new()).unwrap()
}

#[test]
fn uploaded_meshes_sit_at_their_chunk_origin() {
    let config = EngineConfig::from_json_str(r#"{ "load_distance": 3, "mesh_workers": 2 }"#).unwrap();
    let terrain = Arc::new(PerlinTerrain::new(&config.terrain));
    let mut manager = start(config, terrain);
    let view = view_at(Point3::new(8.0, 8.0, 8.0));
    settle(&mut manager, &view);

    assert_eq!(manager.num_chunks(), 27);
    for slot in 0..manager.num_chunks() {
        let chunk = manager.chunk(slot).unwrap().get();
        let record = manager.sink().meshes[&MeshHandle(slot)];
        assert_eq!(record.offset, chunk.world_origin());
        assert_eq!(record.indices % 6, 0);
        assert_eq!(record.vertices / 4 * 6, record.indices);
    }
}

#[test]
fn tight_rebuild_bound_still_drains() {
    let config = EngineConfig {
        load_distance: 4,
        load_workers: 4,
        mesh_workers: 1,
        max_pending_rebuilds: 1,
        worker_poll_interval_ms: 1,
        backpressure_backoff_ms: 0,
        ..EngineConfig::default()
    };
    let mut manager = start(config, Arc::new(FlatTerrain { height: 2 }));
    let view = view_at(Point3::new(0.0, 12.0, 0.0));
    settle(&mut manager, &view);

    let stats = manager.stats();
    assert_eq!(stats.chunks_loaded, 64);
    assert_eq!(stats.meshes_uploaded, 64);
}

#[test]
fn flying_camera_keeps_window_consistent() {
    let config = EngineConfig {
        load_distance: 4,
        load_workers: 2,
        mesh_workers: 2,
        worker_poll_interval_ms: 1,
        ..EngineConfig::default()
    };
    let mut manager = start(config, Arc::new(FlatTerrain { height: 4 }));

    let mut reassigned = 0;
    let mut position = Point3::new(0.5, 10.0, 0.5);
    for _ in 0..40 {
        position.x += 2.0;
        reassigned += manager.update(&view_at(position)).chunks_reassigned;
        thread::sleep(Duration::from_millis(1));
    }
    // x went from 0.5 to 80.5: five chunk borders crossed, one 4 × 4 layer each.
    assert_eq!(reassigned, 5 * 16);
    assert_eq!(manager.offset(), Point3::new(3, -2, -2));

    let view = view_at(position);
    settle(&mut manager, &view);
    assert_eq!(manager.stats().chunks_loaded, 64 + 5 * 16);

    let surface = manager.get_block(Point3::new(80, 4, 0)).unwrap();
    assert_eq!(surface.block_type, BlockType::GRASS);
    assert_eq!(manager.get_block(Point3::new(0, 4, 0)), None);
}

#[test]
fn place_on_picked_face_then_dig_it_out() {
    let config = EngineConfig {
        load_distance: 2,
        worker_poll_interval_ms: 1,
        ..EngineConfig::default()
    };
    let mut manager = start(config, Arc::new(FlatTerrain { height: 4 }));
    let origin = Point3::new(3.0, 9.0, 3.0);
    let view = view_at(origin);
    settle(&mut manager, &view);

    let down = Vector3::new(0.0, -1.0, 0.0);
    let pick = manager.find_block_on_ray(origin, down).unwrap();
    assert_eq!(pick.block, Point3::new(3, 4, 3));
    assert_eq!(pick.face, BlockSide::TOP);

    let placed = pick.placement_position().unwrap();
    assert!(manager.add_block(placed, BlockType::DIRT));
    assert!(manager.add_block(placed + Vector3::new(0, 1, 0), BlockType::STONE));
    settle(&mut manager, &view);

    let pick = manager.find_block_on_ray(origin, down).unwrap();
    assert_eq!(pick.block, Point3::new(3, 6, 3));
    assert_eq!(manager.get_block(placed).unwrap().block_type, BlockType::DIRT);
    // Both edits target one chunk and land in one batch or two, never more.
    assert!(manager.stats().block_batches <= 2);
    assert_eq!(manager.stats().block_updates_applied, 2);

    assert!(manager.remove_block(Point3::new(3, 6, 3)));
    assert!(manager.add_block(placed, BlockType::AIR));
    settle(&mut manager, &view);
    let pick = manager.find_block_on_ray(origin, down).unwrap();
    assert_eq!(pick.block, Point3::new(3, 4, 3));

    manager.shutdown();
}
