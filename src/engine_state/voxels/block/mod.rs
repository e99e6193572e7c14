//! # Block Module
//!
//! Block data, materials, faces and queued block edits.

use block_type::BlockType;
use cgmath::Vector3;

pub mod block_side;
pub mod block_type;
pub mod block_update;

/// The underlying integer type used to encode block materials compactly.
pub type BlockTypeSize = u8;

/// A single voxel.
///
/// An inactive block is empty space whatever its material says; the material is kept so
/// that the last value written stays observable through block queries.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Block {
    pub active: bool,
    pub block_type: BlockType,
}

impl Block {
    /// Creates an active block of the given material.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            active: true,
            block_type,
        }
    }

    /// An inactive air block.
    pub fn air() -> Self {
        Block::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn color(&self) -> Vector3<f32> {
        self.block_type.color()
    }
}
