//! # Chunk Manager
//!
//! Owns the pool of resident chunks and drives the streaming pipeline.
//!
//! ## Responsibilities
//! - Keep a `D × D × D` window of chunks centred on the camera, recycling the slots that
//!   fall off one face of the window onto the opposite face
//! - Feed recycled slots to the load workers and upload finished meshes through the
//!   [`RenderSink`]
//! - Cull the render list by inter-chunk occlusion and by the camera frustum
//! - Answer ray picks and block queries, and queue block edits for the update workers
//!
//! ## Threading
//! Everything here runs on the thread that owns the sink. Workers only see the chunk
//! pool and the queues; the sink is never shared.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use cgmath::{Deg, Point3};
//! use voxel_stream::{
//!     config::EngineConfig,
//!     engine_state::{
//!         camera_state::camera::{Camera, CameraView, Projection},
//!         rendering::render_sink::CountingRenderSink,
//!         voxels::{block::block_type::BlockType, chunk_manager::ChunkManager, terrain::FlatTerrain},
//!     },
//! };
//!
//! let mut manager = ChunkManager::new(
//!     EngineConfig::default(),
//!     Arc::new(FlatTerrain { height: 4 }),
//!     CountingRenderSink::new(),
//! )
//! .unwrap();
//!
//! let camera = Camera::new(Point3::new(0.0, 10.0, 0.0), Deg(0.0), Deg(-30.0));
//! let projection = Projection::new(1280, 720, Deg(70.0), 0.1, 500.0);
//! let view = CameraView::from_camera(&camera, &projection);
//!
//! manager.update(&view);
//! let mut draws = Vec::new();
//! manager.render_chunks(&mut draws, &(), &view);
//! if let Some(target) = manager
//!     .find_block_on_ray(view.position(), camera.forward())
//!     .and_then(|pick| pick.placement_position())
//! {
//!     manager.add_block(target, BlockType::STONE);
//! }
//! ```

use std::sync::Arc;

use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3};
use log::{debug, info, warn};

use crate::{
    config::EngineConfig,
    core::MtResource,
    engine_state::{
        camera_state::camera::CameraView,
        rendering::{
            render_sink::{MeshHandle, RenderSink},
            tasks::chunk_mesh_generation_task::ChunkMeshGenerationTask,
        },
        spatial::chunk_tree::ChunkTree,
        task_management::{
            pipeline::{PipelineQueues, PipelineSnapshot, PipelineStats},
            TaskManager,
        },
        voxels::{
            block::{block_side::BlockSide, block_type::BlockType, block_update::BlockUpdate, Block},
            chunk::{chunk_flags::ChunkFlags, Chunk, CHUNK_DIMENSION},
            coordinates::{compose, decompose, point_to_f32},
            sliding_window::SlidingWindow,
            tasks::{block_update_task::BlockUpdateTask, chunk_load_task::ChunkLoadTask, ChunkPool},
            terrain::TerrainSource,
        },
    },
    error::EngineError,
};

/// What one call to [`ChunkManager::update`] did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Slots recycled to new coordinates because the window moved.
    pub chunks_reassigned: usize,
    pub meshes_uploaded: usize,
    /// Meshes thrown away because their chunk changed while they were being built.
    pub stale_meshes: usize,
}

/// Result of [`ChunkManager::find_block_on_ray`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayPick {
    /// World coordinate of the block that was hit.
    pub block: Point3<i32>,
    /// Face of that block the ray entered through.
    pub face: BlockSide,
    /// World-space hit point.
    pub position: Point3<f32>,
}

impl RayPick {
    /// The empty cell in front of the hit face, where a placed block would go.
    ///
    /// `None` when that cell lies past the edge of the `i32` world.
    pub fn placement_position(&self) -> Option<Point3<i32>> {
        let normal = self.face.normal();
        Some(Point3::new(
            self.block.x.checked_add(normal.x)?,
            self.block.y.checked_add(normal.y)?,
            self.block.z.checked_add(normal.z)?,
        ))
    }
}

/// Per-slot state copied out of the chunk locks while building the render list.
#[derive(Copy, Clone)]
struct SlotState {
    should_render: bool,
    flags: ChunkFlags,
    position: Point3<i32>,
}

pub struct ChunkManager<S: RenderSink> {
    config: EngineConfig,
    chunks: ChunkPool,
    window: SlidingWindow,
    chunk_tree: ChunkTree,
    queues: Arc<PipelineQueues>,
    stats: Arc<PipelineStats>,
    task_manager: TaskManager,
    sink: S,
}

impl<S: RenderSink> ChunkManager<S> {
    /// Allocates the chunk pool, queues every slot for loading and starts the workers.
    ///
    /// The window starts centred on the origin; the first `update` moves it to the camera.
    ///
    /// # Errors
    /// - [`EngineError::InvalidConfig`] if `config` fails validation
    /// - [`EngineError::WorkerSpawn`] if a worker thread cannot be started; workers that
    ///   did start are stopped again before returning
    pub fn new(
        config: EngineConfig,
        terrain: Arc<dyn TerrainSource>,
        sink: S,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let d = config.load_distance;
        let window = SlidingWindow::new(d, Point3::new(-(d / 2), -(d / 2), -(d / 2)));
        let chunks: ChunkPool = (0..window.len())
            .map(|slot| {
                MtResource::new(Chunk::new(window.slot_coordinate(slot), MeshHandle(slot)))
            })
            .collect::<Vec<_>>()
            .into();

        let mut chunk_tree = ChunkTree::new(d);
        for (local, slot) in window.iter_local() {
            chunk_tree.insert(local, slot);
        }

        let queues = Arc::new(PipelineQueues::new(config.max_pending_rebuilds));
        for slot in 0..chunks.len() {
            queues.load.push(slot);
        }
        let stats = Arc::new(PipelineStats::default());

        let mut task_manager = TaskManager::new(config.worker_poll_interval());
        for index in 0..config.load_workers {
            task_manager.spawn(Box::new(ChunkLoadTask::new(
                index,
                chunks.clone(),
                terrain.clone(),
                queues.clone(),
                stats.clone(),
                config.backpressure_backoff(),
            )))?;
        }
        for index in 0..config.mesh_workers {
            task_manager.spawn(Box::new(ChunkMeshGenerationTask::new(
                index,
                chunks.clone(),
                queues.clone(),
                stats.clone(),
            )))?;
        }
        for index in 0..config.block_update_workers {
            task_manager.spawn(Box::new(BlockUpdateTask::new(
                index,
                chunks.clone(),
                queues.clone(),
                stats.clone(),
            )))?;
        }

        info!(
            "Chunk manager created: {} chunks, {} workers",
            chunks.len(),
            task_manager.num_workers()
        );

        Ok(ChunkManager {
            config,
            chunks,
            window,
            chunk_tree,
            queues,
            stats,
            task_manager,
            sink,
        })
    }

    /// Per-frame step: follows the camera with the window and uploads every mesh the
    /// workers have finished since the last call.
    pub fn update(&mut self, camera: &CameraView) -> UpdateSummary {
        let mut summary = UpdateSummary::default();

        let new_offset =
            SlidingWindow::offset_for_position(camera.position(), self.window.load_distance());
        if new_offset != self.window.offset() {
            let reassigned = self.window.shift(new_offset);
            for &(slot, coord) in &reassigned {
                self.chunks[slot].get_mut().move_to(coord);
                self.queues.load.push(slot);
            }
            for (local, slot) in self.window.iter_local() {
                self.chunk_tree.insert(local, slot);
            }
            summary.chunks_reassigned = reassigned.len();
        }

        while let Some(mesher) = self.queues.upload.try_pop() {
            let slot = mesher.handle().0;
            let Some(chunk) = self.chunks.get(slot) else {
                warn!("Missing chunk for mesh handle {slot}");
                continue;
            };
            let mut chunk = chunk.get_mut();
            if mesher.finalize(&mut chunk, &mut self.sink) {
                summary.meshes_uploaded += 1;
                PipelineStats::bump(&self.stats.meshes_uploaded);
            } else {
                summary.stale_meshes += 1;
                PipelineStats::bump(&self.stats.stale_meshes);
            }
        }

        summary
    }

    /// Draws every visible chunk through the sink.
    ///
    /// # Returns
    /// The number of draw calls issued.
    pub fn render_chunks(
        &mut self,
        target: &mut S::Target,
        shader: &S::Shader,
        camera: &CameraView,
    ) -> usize {
        let visible = self.render_list(camera);
        for handle in &visible {
            self.sink.draw_mesh(target, shader, *handle, camera);
        }
        visible.len()
    }

    /// Mesh handles of the chunks that would be drawn for `camera`.
    ///
    /// A chunk is listed when its mesh is current and non-empty, it is not an interior
    /// chunk walled in by occluding faces on all six sides, and its bounding cube touches
    /// the view frustum.
    pub fn render_list(&self, camera: &CameraView) -> Vec<MeshHandle> {
        let states: Vec<SlotState> = self
            .chunks
            .iter()
            .map(|chunk| {
                let chunk = chunk.get();
                SlotState {
                    should_render: chunk.should_render(),
                    flags: *chunk.flags(),
                    position: chunk.position,
                }
            })
            .collect();

        let side = CHUNK_DIMENSION as f32;
        self.window
            .iter_local()
            .filter(|&(local, slot)| {
                let state = states[slot];
                if !state.should_render {
                    return false;
                }
                if self.window.is_interior(local) && self.is_occluded(local, &states) {
                    return false;
                }
                let min = point_to_f32(state.position * CHUNK_DIMENSION) - Vector3::new(0.5, 0.5, 0.5);
                camera.frustum.intersects_cube(min, side)
            })
            .map(|(_, slot)| MeshHandle(slot))
            .collect()
    }

    fn is_occluded(&self, local: Point3<i32>, states: &[SlotState]) -> bool {
        BlockSide::all().into_iter().all(|side| {
            let neighbour = local + side.normal();
            match self.window.slot_at_local(neighbour) {
                Some(slot) => states[slot].flags.occludes(side.opposite()),
                None => {
                    warn!("Missing chunk at window position {neighbour:?}");
                    false
                }
            }
        })
    }

    /// Finds the first active block along a world-space ray.
    ///
    /// Blocks are unit cubes centred on integer coordinates. The ray is moved into
    /// window-local chunk space and resolved by the chunk tree, which descends into the
    /// block tree of each chunk it crosses. A block containing `origin` is never reported.
    pub fn find_block_on_ray(&self, origin: Point3<f32>, direction: Vector3<f32>) -> Option<RayPick> {
        if direction.magnitude2() == 0.0 {
            return None;
        }
        let scale = CHUNK_DIMENSION as f32;
        let window_origin = point_to_f32(self.window.offset()).to_vec();
        let local_origin = Point3::from_vec(origin.to_vec() / scale - window_origin);

        let hit = self
            .chunk_tree
            .ray_intersect(local_origin, direction, &self.chunks)?;

        let chunk = self.window.offset() + hit.chunk.to_vec();
        Some(RayPick {
            block: compose(chunk, hit.block),
            face: BlockSide::dominant(hit.block_position - point_to_f32(hit.block)),
            position: Point3::from_vec((hit.position.to_vec() + window_origin) * scale),
        })
    }

    /// Queues activation of the block at `world` with `material`. Placing
    /// [`BlockType::AIR`] clears the block instead.
    ///
    /// # Returns
    /// `false` if the block's chunk is not resident and loaded.
    pub fn add_block(&self, world: Point3<i32>, material: BlockType) -> bool {
        if material == BlockType::AIR {
            return self.remove_block(world);
        }
        let (chunk, local) = decompose(world);
        self.queue_update(BlockUpdate::place(chunk, local, material))
    }

    /// Queues deactivation of the block at `world`.
    ///
    /// # Returns
    /// `false` if the block's chunk is not resident and loaded.
    pub fn remove_block(&self, world: Point3<i32>) -> bool {
        let (chunk, local) = decompose(world);
        self.queue_update(BlockUpdate::clear(chunk, local))
    }

    fn queue_update(&self, update: BlockUpdate) -> bool {
        let Some(slot) = self.window.slot_for_chunk(update.chunk_position) else {
            debug!("Block update outside the window at chunk {:?}", update.chunk_position);
            return false;
        };
        if !self.chunks[slot].get().is_loaded() {
            debug!("Block update for chunk {:?} before it loaded", update.chunk_position);
            return false;
        }
        self.queues.push_block_update(slot, update);
        true
    }

    /// Reads the block at `world`.
    ///
    /// Edits queued with [`add_block`](Self::add_block) show up once a block update worker
    /// has applied them. Returns `None` outside the window and for chunks still loading.
    pub fn get_block(&self, world: Point3<i32>) -> Option<Block> {
        let (chunk_position, local) = decompose(world);
        let slot = self.window.slot_for_chunk(chunk_position)?;
        let chunk = self.chunks[slot].get();
        if !chunk.is_loaded() || chunk.position != chunk_position {
            return None;
        }
        chunk.get_block(local)
    }

    /// True when nothing is queued or in flight and every resident chunk is loaded with
    /// an uploaded mesh.
    pub fn is_idle(&self) -> bool {
        let queues = &self.queues;
        if queues.pending_block_updates() > 0
            || !queues.load.is_empty()
            || !queues.rebuild.is_empty()
            || !queues.upload.is_empty()
            || !queues.block_update_signal.is_empty()
        {
            return false;
        }
        self.chunks.iter().all(|chunk| {
            let chunk = chunk.get();
            chunk.is_loaded() && !chunk.needs_rebuild()
        })
    }

    pub fn stats(&self) -> PipelineSnapshot {
        self.stats.snapshot()
    }

    /// World chunk coordinate of the window's local origin.
    pub fn offset(&self) -> Point3<i32> {
        self.window.offset()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// The chunk currently stored in pool slot `slot`.
    pub fn chunk(&self, slot: usize) -> Option<&MtResource<Chunk>> {
        self.chunks.get(slot)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Stops and joins every worker. Queued work is abandoned; chunks it would have
    /// touched keep their rebuild flag and are simply not drawn. Dropping the manager
    /// does the same through its [`TaskManager`].
    pub fn shutdown(&mut self) {
        self.task_manager.shutdown();
    }
}
