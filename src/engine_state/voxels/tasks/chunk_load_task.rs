//! # Chunk Load Task
//!
//! Fills recycled chunk slots with terrain. This is the first stage of the pipeline:
//! every slot the sliding window reassigns lands on the load queue, and a loaded slot
//! moves on to the rebuild queue.

use std::{sync::Arc, thread, time::Duration};

use log::{trace, warn};

use super::ChunkPool;
use crate::engine_state::{
    task_management::{
        pipeline::{PipelineQueues, PipelineStats},
        task::{Task, TaskOutcome},
    },
    voxels::terrain::TerrainSource,
};

/// Pops slots from the load queue and regenerates them from a [`TerrainSource`].
///
/// Admission into the rebuild queue is throttled: when it already holds
/// `max_pending_rebuilds` slots, the popped slot goes back onto the load queue and the
/// worker sleeps for `backoff` before trying again. Nothing ever blocks on a full queue.
pub struct ChunkLoadTask {
    name: String,
    chunks: ChunkPool,
    terrain: Arc<dyn TerrainSource>,
    queues: Arc<PipelineQueues>,
    stats: Arc<PipelineStats>,
    backoff: Duration,
}

impl ChunkLoadTask {
    pub fn new(
        index: usize,
        chunks: ChunkPool,
        terrain: Arc<dyn TerrainSource>,
        queues: Arc<PipelineQueues>,
        stats: Arc<PipelineStats>,
        backoff: Duration,
    ) -> Self {
        ChunkLoadTask {
            name: format!("chunk-load-{index}"),
            chunks,
            terrain,
            queues,
            stats,
            backoff,
        }
    }
}

impl Task for ChunkLoadTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn process_next(&mut self, timeout: Duration) -> TaskOutcome {
        let Some(slot) = self.queues.load.pop_timeout(timeout) else {
            return TaskOutcome::Idle;
        };

        if self.queues.rebuild_backlogged() {
            trace!("Rebuild queue backlogged, requeueing chunk slot {slot}");
            self.queues.load.push(slot);
            PipelineStats::bump(&self.stats.load_requeues);
            thread::sleep(self.backoff);
            return TaskOutcome::Requeued;
        }

        let Some(chunk) = self.chunks.get(slot) else {
            warn!("Missing chunk for slot {slot}, dropping load");
            return TaskOutcome::Processed;
        };

        {
            let mut chunk = chunk.get_mut();
            chunk.load(self.terrain.as_ref());
            trace!("Loaded chunk {:?} into slot {slot}", chunk.position);
        }

        PipelineStats::bump(&self.stats.chunks_loaded);
        self.queues.rebuild.push(slot);
        TaskOutcome::Processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::MtResource,
        engine_state::{
            rendering::render_sink::MeshHandle,
            voxels::{
                block::block_type::BlockType,
                chunk::Chunk,
                terrain::FlatTerrain,
            },
        },
    };
    use cgmath::Point3;

    fn setup(max_pending_rebuilds: usize) -> (ChunkLoadTask, Arc<PipelineQueues>, Arc<PipelineStats>, ChunkPool) {
        let chunks: ChunkPool = (0..2)
            .map(|slot| MtResource::new(Chunk::new(Point3::new(slot as i32, 0, 0), MeshHandle(slot))))
            .collect::<Vec<_>>()
            .into();
        let queues = Arc::new(PipelineQueues::new(max_pending_rebuilds));
        let stats = Arc::new(PipelineStats::default());
        let task = ChunkLoadTask::new(
            0,
            chunks.clone(),
            Arc::new(FlatTerrain { height: 4 }),
            queues.clone(),
            stats.clone(),
            Duration::ZERO,
        );
        (task, queues, stats, chunks)
    }

    #[test]
    fn loads_and_forwards_to_rebuild() {
        let (mut task, queues, stats, chunks) = setup(4);
        queues.load.push(1);

        assert_eq!(task.process_next(Duration::from_millis(1)), TaskOutcome::Processed);
        assert_eq!(queues.rebuild.try_pop(), Some(1));
        assert_eq!(stats.snapshot().chunks_loaded, 1);

        let chunk = chunks[1].get();
        assert_eq!(chunk.get_block(Point3::new(0, 4, 0)).map(|b| b.block_type), Some(BlockType::GRASS));
        assert!(!chunk.get_block(Point3::new(0, 5, 0)).map_or(true, |b| b.is_active()));
        assert!(chunk.needs_rebuild());
    }

    #[test]
    fn requeues_while_rebuild_queue_is_full() {
        let (mut task, queues, stats, _chunks) = setup(1);
        queues.rebuild.push(0);
        queues.load.push(1);

        assert_eq!(task.process_next(Duration::from_millis(1)), TaskOutcome::Requeued);
        assert_eq!(queues.load.len(), 1);
        assert_eq!(stats.snapshot().load_requeues, 1);
        assert_eq!(stats.snapshot().chunks_loaded, 0);

        assert_eq!(queues.rebuild.try_pop(), Some(0));
        assert_eq!(task.process_next(Duration::from_millis(1)), TaskOutcome::Processed);
        assert_eq!(queues.rebuild.try_pop(), Some(1));
    }

    #[test]
    fn idles_on_empty_queue() {
        let (mut task, _queues, _stats, _chunks) = setup(1);
        assert_eq!(task.process_next(Duration::from_millis(1)), TaskOutcome::Idle);
    }
}
