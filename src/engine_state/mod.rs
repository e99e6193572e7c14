//! # Engine State Module
//!
//! Everything the voxel world needs at runtime, minus the GPU.
//!
//! ## Key Components
//!
//! * `camera_state` - Camera, projection and per-frame view with its frustum
//! * `rendering` - Greedy meshing and the `RenderSink` boundary to a graphics backend
//! * `spatial` - Arena octrees over blocks and over resident chunks
//! * `task_management` - Worker threads and the queues connecting pipeline stages
//! * `voxels` - Blocks, chunks, terrain and the `ChunkManager`
//!
//! ## Performance Considerations
//!
//! * Chunk storage is pooled and recycled as the camera moves, never reallocated
//! * Loading and meshing run on worker threads; only mesh uploads touch the main thread
//! * Greedy meshing merges coplanar faces to keep vertex counts low
//! * Interior chunks walled in by solid neighbours are culled before frustum tests

pub mod camera_state;
pub mod rendering;
pub mod spatial;
pub mod task_management;
pub mod voxels;
