//! # Voxel World Core
//!
//! Blocks, chunks and the machinery that streams chunks around the camera.
//!
//! ## Architecture
//!
//! * **Block**: materials, faces and queued block edits
//! * **Chunk**: a `16³` cube of blocks with its own block tree, occlusion flags and revision
//! * **Terrain**: height-field sources consulted when a chunk is loaded
//! * **Sliding window**: maps pool slots to world chunk coordinates as the camera moves
//! * **Chunk manager**: owns the pool, the pipeline workers and the render sink
//! * **Tasks**: the load and block-update pipeline stages
//!
//! ## Data Flow
//!
//! 1. The chunk manager moves the window and queues every recycled slot for loading
//! 2. A load worker fills the slot from the terrain source and queues it for meshing
//! 3. A mesh worker builds the greedy mesh and hands it to the main thread
//! 4. The main thread uploads the mesh, after which the chunk is eligible for drawing
//!
//! Block edits enter at step 3: an update worker applies the slot's pending batch and
//! queues the chunk for meshing.
//!
//! ## Thread Safety
//!
//! Each chunk sits behind its own `MtResource`, so workers on different chunks never
//! contend. Block queries take a short read lock and may observe a chunk between two
//! update batches, never in the middle of one.

pub mod block;
pub mod chunk;
pub mod chunk_manager;
pub mod coordinates;
pub mod sliding_window;
pub mod tasks;
pub mod terrain;
