//! Mesh generation for voxel chunks.
//!
//! # Architecture
//! - `mesh::greedy`: the slice-by-slice greedy sweep that turns block data into quads
//! - `mesh::mesh`: `ChunkMesher`, the quad accumulator, and `MeshBuffers`, the owned
//!   vertex/index arrays it hands to the render sink
//! - `mesh::face`: the `(material, side)` key quads are merged on
//!
//! # Performance Considerations
//! - Greedy merging keeps a solid chunk at six quads regardless of its size
//! - Buffers are owned values, so a finished mesh crosses threads by move without copies

pub mod mesh;

pub use mesh::{
    face::FaceDescriptor,
    greedy,
    mesh::{ChunkMesher, MeshBuffers},
};
