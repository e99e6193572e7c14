//! Face descriptors used as the merge key of the greedy mesher.

use crate::engine_state::voxels::block::{block_side::BlockSide, block_type::BlockType};

/// A visible block face in a slice mask.
///
/// Two neighbouring mask cells merge into one quad only if their descriptors are equal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FaceDescriptor {
    pub block_type: BlockType,
    pub side: BlockSide,
}

impl FaceDescriptor {
    pub fn new(block_type: BlockType, side: BlockSide) -> Self {
        FaceDescriptor { block_type, side }
    }
}
