//! # Chunk Iteration
//!
//! Iterator over the active blocks of a chunk, in block-array order.

use cgmath::Point3;

use super::{Chunk, CHUNK_DIMENSION, CHUNK_SIZE};
use crate::engine_state::voxels::block::Block;

/// Yields `(local coordinate, block)` for every active block of a chunk.
///
/// The walk runs X fastest, then Y, then Z, matching the layout of the block array.
pub struct ChunkBlockIterator<'a> {
    chunk: &'a Chunk,
    index: i32,
}

impl<'a> ChunkBlockIterator<'a> {
    pub fn new(chunk: &'a Chunk) -> Self {
        ChunkBlockIterator { chunk, index: 0 }
    }
}

impl<'a> Iterator for ChunkBlockIterator<'a> {
    type Item = (Point3<i32>, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < CHUNK_SIZE {
            let i = self.index;
            self.index += 1;

            let x = i % CHUNK_DIMENSION;
            let y = (i / CHUNK_DIMENSION) % CHUNK_DIMENSION;
            let z = i / (CHUNK_DIMENSION * CHUNK_DIMENSION);
            let block = self.chunk.block_at(x as usize, y as usize, z as usize);
            if block.active {
                return Some((Point3::new(x, y, z), block));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::{
        rendering::render_sink::MeshHandle,
        voxels::block::block_type::BlockType,
    };

    #[test]
    fn yields_only_active_blocks_in_array_order() {
        let mut chunk = Chunk::new(Point3::new(0, 0, 0), MeshHandle(0));
        chunk.set_block(Point3::new(0, 0, 1), Block::new(BlockType::DIRT));
        chunk.set_block(Point3::new(5, 0, 0), Block::new(BlockType::STONE));

        let found: Vec<_> = chunk.active_blocks().map(|(p, b)| (p, b.block_type)).collect();
        assert_eq!(
            found,
            vec![
                (Point3::new(5, 0, 0), BlockType::STONE),
                (Point3::new(0, 0, 1), BlockType::DIRT),
            ]
        );
    }
}
