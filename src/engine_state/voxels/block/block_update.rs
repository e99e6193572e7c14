use cgmath::Point3;

use super::{block_type::BlockType, Block};

/// A queued edit to one block of one chunk.
///
/// `chunk_position` records which world chunk the edit was aimed at when it was
/// requested. If the slot has been recycled for a different chunk before a worker gets
/// to it, the edit is dropped instead of landing in the wrong place.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockUpdate {
    pub chunk_position: Point3<i32>,
    /// Chunk-local coordinate, each component in `0..CHUNK_DIMENSION`.
    pub local_position: Point3<i32>,
    pub make_active: bool,
    pub material: BlockType,
}

impl BlockUpdate {
    pub fn place(chunk_position: Point3<i32>, local_position: Point3<i32>, material: BlockType) -> Self {
        BlockUpdate {
            chunk_position,
            local_position,
            make_active: true,
            material,
        }
    }

    pub fn clear(chunk_position: Point3<i32>, local_position: Point3<i32>) -> Self {
        BlockUpdate {
            chunk_position,
            local_position,
            make_active: false,
            material: BlockType::AIR,
        }
    }

    /// The block value this update writes.
    pub fn block(&self) -> Block {
        Block {
            active: self.make_active,
            block_type: self.material,
        }
    }
}
