//! # Block Update Task
//!
//! Applies queued block edits. `ChunkManager::add_block` and `remove_block` only record
//! a [`BlockUpdate`](crate::engine_state::voxels::block::block_update::BlockUpdate) in
//! the slot's pending batch; this worker drains a whole batch under the chunk's write
//! lock and sends the chunk to the rebuild queue once.

use std::{sync::Arc, time::Duration};

use log::{debug, warn};

use super::ChunkPool;
use crate::engine_state::task_management::{
    pipeline::{PipelineQueues, PipelineStats},
    task::{Task, TaskOutcome},
};

pub struct BlockUpdateTask {
    name: String,
    chunks: ChunkPool,
    queues: Arc<PipelineQueues>,
    stats: Arc<PipelineStats>,
}

impl BlockUpdateTask {
    pub fn new(
        index: usize,
        chunks: ChunkPool,
        queues: Arc<PipelineQueues>,
        stats: Arc<PipelineStats>,
    ) -> Self {
        BlockUpdateTask {
            name: format!("block-update-{index}"),
            chunks,
            queues,
            stats,
        }
    }
}

impl Task for BlockUpdateTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn process_next(&mut self, timeout: Duration) -> TaskOutcome {
        let Some(slot) = self.queues.block_update_signal.pop_timeout(timeout) else {
            return TaskOutcome::Idle;
        };
        let Some(chunk) = self.chunks.get(slot) else {
            warn!("Missing chunk for slot {slot}, dropping block updates");
            self.queues.take_block_updates(slot);
            return TaskOutcome::Processed;
        };

        // Taken under the chunk lock, so batches for one chunk apply in order.
        let mut chunk = chunk.get_mut();
        let updates = self.queues.take_block_updates(slot);
        if updates.is_empty() {
            return TaskOutcome::Processed;
        }

        let mut applied = 0;
        let mut skipped = 0;
        for update in &updates {
            if update.chunk_position != chunk.position {
                skipped += 1;
                continue;
            }
            if chunk.apply_update(update) {
                applied += 1;
            } else {
                skipped += 1;
            }
        }
        if skipped > 0 {
            debug!(
                "Skipped {skipped} block updates for slot {slot}, now holding chunk {:?}",
                chunk.position
            );
        }
        drop(chunk);

        PipelineStats::bump(&self.stats.block_batches);
        PipelineStats::add(&self.stats.block_updates_applied, applied);
        PipelineStats::add(&self.stats.block_updates_skipped, skipped);
        if applied > 0 {
            self.queues.rebuild.push(slot);
        }
        TaskOutcome::Processed
    }
}
