//! # Chunk Pipeline Plumbing
//!
//! The channels connecting the pipeline stages and the counters describing them.
//!
//! ```text
//!   load ──► [load worker] ──► rebuild ──► [mesh worker] ──► upload ──► main thread
//!    ▲              │
//!    └── requeue ───┘  (rebuild backlog >= max_pending_rebuilds)
//!
//!   add/remove block ──► pending[slot] + block_update_signal ──► [block update worker] ──► rebuild
//! ```
//!
//! Chunks travel through the queues as pool slot indices. Only the upload queue carries
//! data: the finished [`ChunkMesher`], handed over by value to the thread that owns the
//! render sink.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use crossbeam_channel::{Receiver, Sender};

use crate::{
    core::MtResource,
    engine_state::{rendering::meshing::ChunkMesher, voxels::block::block_update::BlockUpdate},
};

/// An unbounded multi-producer multi-consumer queue.
#[derive(Clone, Debug)]
pub struct WorkQueue<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
}

impl<T> WorkQueue<T> {
    pub fn unbounded() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        WorkQueue { sender, receiver }
    }

    pub fn push(&self, item: T) {
        // Both ends live in `self`, so the channel cannot be disconnected here.
        if self.sender.send(item).is_err() {
            log::error!("Work queue disconnected");
        }
    }

    /// Waits at most `timeout` for an item.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<T> {
        self.receiver.recv_timeout(timeout).ok()
    }

    pub fn try_pop(&self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

/// Every queue of the chunk pipeline.
pub struct PipelineQueues {
    /// Slots whose contents must be regenerated from the terrain source.
    pub load: WorkQueue<usize>,
    /// Slots whose mesh must be rebuilt.
    pub rebuild: WorkQueue<usize>,
    /// Finished meshes waiting for the main thread.
    pub upload: WorkQueue<ChunkMesher>,
    /// One entry per queued block update, naming the slot it targets.
    pub block_update_signal: WorkQueue<usize>,
    pending_updates: MtResource<HashMap<usize, Vec<BlockUpdate>>>,
    max_pending_rebuilds: usize,
}

impl PipelineQueues {
    pub fn new(max_pending_rebuilds: usize) -> Self {
        PipelineQueues {
            load: WorkQueue::unbounded(),
            rebuild: WorkQueue::unbounded(),
            upload: WorkQueue::unbounded(),
            block_update_signal: WorkQueue::unbounded(),
            pending_updates: MtResource::new(HashMap::new()),
            max_pending_rebuilds: max_pending_rebuilds.max(1),
        }
    }

    /// True when the rebuild queue holds as many slots as load workers may admit.
    pub fn rebuild_backlogged(&self) -> bool {
        self.rebuild.len() >= self.max_pending_rebuilds
    }

    pub fn max_pending_rebuilds(&self) -> usize {
        self.max_pending_rebuilds
    }

    /// Appends `update` to the pending batch of `slot` and wakes a block update worker.
    pub fn push_block_update(&self, slot: usize, update: BlockUpdate) {
        self.pending_updates
            .get_mut()
            .entry(slot)
            .or_default()
            .push(update);
        self.block_update_signal.push(slot);
    }

    /// Removes and returns the whole pending batch of `slot`, oldest first.
    ///
    /// Several signals may name the same slot; only the first one to arrive finds a
    /// batch, the later ones get an empty vector.
    pub fn take_block_updates(&self, slot: usize) -> Vec<BlockUpdate> {
        self.pending_updates
            .get_mut()
            .remove(&slot)
            .unwrap_or_default()
    }

    /// Number of block updates not yet taken by a worker.
    pub fn pending_block_updates(&self) -> usize {
        self.pending_updates.get().values().map(Vec::len).sum()
    }
}

/// Lock-free throughput counters, updated by every stage.
#[derive(Debug, Default)]
pub struct PipelineStats {
    pub(crate) chunks_loaded: AtomicUsize,
    pub(crate) load_requeues: AtomicUsize,
    pub(crate) meshes_built: AtomicUsize,
    pub(crate) meshes_uploaded: AtomicUsize,
    pub(crate) stale_meshes: AtomicUsize,
    pub(crate) block_batches: AtomicUsize,
    pub(crate) block_updates_applied: AtomicUsize,
    pub(crate) block_updates_skipped: AtomicUsize,
}

/// Point-in-time copy of [`PipelineStats`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineSnapshot {
    pub chunks_loaded: usize,
    pub load_requeues: usize,
    pub meshes_built: usize,
    pub meshes_uploaded: usize,
    pub stale_meshes: usize,
    pub block_batches: usize,
    pub block_updates_applied: usize,
    pub block_updates_skipped: usize,
}

impl PipelineStats {
    #[inline]
    pub(crate) fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add(counter: &AtomicUsize, amount: usize) {
        counter.fetch_add(amount, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PipelineSnapshot {
        let read = |counter: &AtomicUsize| counter.load(Ordering::Relaxed);
        PipelineSnapshot {
            chunks_loaded: read(&self.chunks_loaded),
            load_requeues: read(&self.load_requeues),
            meshes_built: read(&self.meshes_built),
            meshes_uploaded: read(&self.meshes_uploaded),
            stale_meshes: read(&self.stale_meshes),
            block_batches: read(&self.block_batches),
            block_updates_applied: read(&self.block_updates_applied),
            block_updates_skipped: read(&self.block_updates_skipped),
        }
    }
}
