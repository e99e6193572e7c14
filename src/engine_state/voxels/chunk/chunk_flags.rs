use bitvec::{array::BitArray, order::Lsb0};

use crate::engine_state::voxels::block::block_side::BlockSide;

const EMPTY_BIT: usize = 6;
const NEEDS_REBUILD_BIT: usize = 7;

/// Per-chunk status bits.
///
/// Bits 0..6 say whether the chunk's boundary layer on that side (indexed by
/// [`BlockSide`]) is completely filled with active blocks. Bit 6 marks a chunk whose
/// last mesh had no quads, bit 7 one whose mesh is out of date.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChunkFlags {
    bits: BitArray<[u8; 1], Lsb0>,
}

impl Default for ChunkFlags {
    fn default() -> Self {
        ChunkFlags {
            bits: BitArray::new([0]),
        }
    }
}

impl ChunkFlags {
    pub fn occludes(&self, side: BlockSide) -> bool {
        self.bits[side as usize]
    }

    pub fn set_occludes(&mut self, side: BlockSide, occludes: bool) {
        self.bits.set(side as usize, occludes);
    }

    pub fn clear_occlusion(&mut self) {
        for side in BlockSide::all() {
            self.bits.set(side as usize, false);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bits[EMPTY_BIT]
    }

    pub fn set_empty(&mut self, empty: bool) {
        self.bits.set(EMPTY_BIT, empty);
    }

    pub fn needs_rebuild(&self) -> bool {
        self.bits[NEEDS_REBUILD_BIT]
    }

    pub fn set_needs_rebuild(&mut self, needs_rebuild: bool) {
        self.bits.set(NEEDS_REBUILD_BIT, needs_rebuild);
    }
}
