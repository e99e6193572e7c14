//! Task for generating mesh data for chunks in a background thread.
//!
//! The worker never touches the render sink. It produces a [`ChunkMesher`] under the
//! chunk's write lock and sends it down the upload queue; the main thread uploads it
//! during `ChunkManager::update`.
//!
//! [`ChunkMesher`]: crate::engine_state::rendering::meshing::ChunkMesher

use std::{sync::Arc, time::Duration};

use log::{trace, warn};
use web_time::Instant;

use crate::engine_state::{
    task_management::{
        pipeline::{PipelineQueues, PipelineStats},
        task::{Task, TaskOutcome},
    },
    voxels::tasks::ChunkPool,
};

/// Pops slots from the rebuild queue and meshes them.
pub struct ChunkMeshGenerationTask {
    name: String,
    chunks: ChunkPool,
    queues: Arc<PipelineQueues>,
    stats: Arc<PipelineStats>,
}

impl ChunkMeshGenerationTask {
    pub fn new(
        index: usize,
        chunks: ChunkPool,
        queues: Arc<PipelineQueues>,
        stats: Arc<PipelineStats>,
    ) -> Self {
        ChunkMeshGenerationTask {
            name: format!("chunk-mesh-{index}"),
            chunks,
            queues,
            stats,
        }
    }
}

impl Task for ChunkMeshGenerationTask {
    fn name(&self) -> &str {
        &self.name
    }

    /// Meshes one chunk.
    ///
    /// Chunks whose mesh is already current are skipped; that happens when a slot was
    /// queued more than once before its first rebuild was uploaded. Recycled chunks
    /// still waiting for their load are skipped too, the load requeues them.
    fn process_next(&mut self, timeout: Duration) -> TaskOutcome {
        let Some(slot) = self.queues.rebuild.pop_timeout(timeout) else {
            return TaskOutcome::Idle;
        };
        let Some(chunk) = self.chunks.get(slot) else {
            warn!("Missing chunk for slot {slot}, dropping rebuild");
            return TaskOutcome::Processed;
        };

        let start = Instant::now();
        let mesher = {
            let mut chunk = chunk.get_mut();
            if !chunk.needs_rebuild() || !chunk.is_loaded() {
                return TaskOutcome::Processed;
            }
            let mesher = chunk.rebuild();
            trace!(
                "Meshed chunk {:?} in {:?}: {} faces merged into {} quads",
                chunk.position,
                start.elapsed(),
                mesher.merged_face_count(),
                mesher.quad_count()
            );
            mesher
        };

        PipelineStats::bump(&self.stats.meshes_built);
        self.queues.upload.push(mesher);
        TaskOutcome::Processed
    }
}
