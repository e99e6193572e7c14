//! # Voxel Task System
//!
//! Pipeline stages that change block data. Both run on worker threads owned by the
//! `TaskManager` and hand their chunk on to the rebuild queue when they are done.
//!
//! - `ChunkLoadTask`: regenerates recycled chunks from the terrain source, requeueing
//!   itself while the rebuild queue is backlogged
//! - `BlockUpdateTask`: applies the pending block edits of one chunk as a batch

pub mod block_update_task;
pub mod chunk_load_task;

use std::sync::Arc;

use crate::{core::MtResource, engine_state::voxels::chunk::Chunk};

/// The chunk pool shared by the chunk manager and every worker, indexed by slot.
pub type ChunkPool = Arc<[MtResource<Chunk>]>;
