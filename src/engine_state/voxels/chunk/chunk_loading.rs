//! # Chunk Loading
//!
//! Fills a chunk's blocks from a terrain height field. Each world column is layered as:
//! grass at the surface height, three blocks of dirt below it, stone further down and
//! air above.

use cgmath::Point3;

use super::{Chunk, CHUNK_DIMENSION};
use crate::engine_state::voxels::{
    block::{block_type::BlockType, Block},
    terrain::TerrainSource,
};

/// Depth of the dirt layer beneath the grass.
const DIRT_DEPTH: i32 = 3;

/// The block found at world height `world_y` in a column whose surface is at `height`.
pub fn block_for_height(world_y: i32, height: i32) -> Block {
    if world_y < height - DIRT_DEPTH {
        Block::new(BlockType::STONE)
    } else if world_y < height {
        Block::new(BlockType::DIRT)
    } else if world_y == height {
        Block::new(BlockType::GRASS)
    } else {
        Block::air()
    }
}

impl Chunk {
    /// Regenerates every block from `terrain` at the chunk's current position.
    ///
    /// Occlusion bits are cleared and the chunk is marked for rebuild; the block tree
    /// is repopulated from scratch.
    pub fn load(&mut self, terrain: &dyn TerrainSource) {
        let origin = Point3::new(
            self.position.x * CHUNK_DIMENSION,
            self.position.y * CHUNK_DIMENSION,
            self.position.z * CHUNK_DIMENSION,
        );
        let d = CHUNK_DIMENSION as usize;

        for z in 0..d {
            for x in 0..d {
                let height = terrain.height(origin.x + x as i32, origin.z + z as i32);
                for y in 0..d {
                    let index = Self::index(x, y, z);
                    self.blocks[index] = block_for_height(origin.y + y as i32, height);
                }
            }
        }

        self.loaded = true;
        self.rebuild_block_tree();
        self.flags.clear_occlusion();
        self.flags.set_empty(false);
        self.invalidate();
    }
}
