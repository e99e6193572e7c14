//! # Spatial Index
//!
//! Sparse octrees used for ray picking.
//!
//! ## Architecture
//!
//! * `Octree<T>`: arena of nodes addressed by index, lazily subdivided, pruned on removal
//! * `BlockTree`: one per chunk, indexes active blocks in block units
//! * `ChunkTree`: one per chunk manager, indexes resident chunks in chunk units and
//!   forwards ray queries into the block trees of the chunks it crosses
//!
//! The two trees share a coordinate convention: block `i` is centred on integer `i`, and a
//! chunk leaf is offset by half a block so that scaling a chunk-space point by
//! `CHUNK_DIMENSION` lands it in the chunk's block space.

pub mod aabb;
pub mod block_tree;
pub mod chunk_tree;
pub mod octree;
