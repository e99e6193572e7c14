//! Background tasks for the rendering system.
//!
//! # Available Tasks
//! - `ChunkMeshGenerationTask`: runs the greedy mesher for chunks on the rebuild queue and
//!   hands the finished buffers to the main thread

pub mod chunk_mesh_generation_task;
