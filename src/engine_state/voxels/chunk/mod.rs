//! # Chunk Module
//!
//! A chunk is a cube of `CHUNK_DIMENSION³` blocks and the unit of loading, meshing and
//! culling. Chunks are pooled: a fixed set of them is allocated up front and each one is
//! moved to a new world coordinate and reloaded when the camera leaves it behind.
//!
//! ## Architecture
//!
//! Alongside the dense block array each chunk keeps:
//! * a `BlockTree` holding exactly its active blocks, for ray picking
//! * `ChunkFlags` with per-side boundary occlusion, the empty flag and the rebuild flag
//! * a `revision` counter, bumped by every change that invalidates the current mesh
//!
//! ## Thread Safety
//!
//! A chunk is always reached through an `MtResource<Chunk>`. Loading, rebuilding and
//! block-update batches each run under one write guard.

pub mod chunk_flags;
pub mod chunk_iteration;
pub mod chunk_loading;

use cgmath::{Point3, Vector3};

use chunk_flags::ChunkFlags;
use chunk_iteration::ChunkBlockIterator;

use crate::engine_state::{
    rendering::{
        meshing::{greedy, ChunkMesher},
        render_sink::MeshHandle,
    },
    spatial::block_tree::BlockTree,
    voxels::{
        block::{block_side::BlockSide, block_update::BlockUpdate, block_type::BlockType, Block},
        coordinates::in_cube,
    },
};

/// Edge length of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// Number of blocks in one layer of a chunk.
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// Number of blocks in a chunk.
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;

/// A pooled cube of blocks at one world chunk coordinate.
#[derive(Clone, Debug)]
pub struct Chunk {
    /// World chunk coordinate; block `(x, y, z)` of this chunk sits at world block
    /// `position * CHUNK_DIMENSION + (x, y, z)`.
    pub position: Point3<i32>,
    blocks: Vec<Block>,
    flags: ChunkFlags,
    block_tree: BlockTree,
    mesh_handle: MeshHandle,
    revision: u64,
    loaded: bool,
}

impl Chunk {
    /// Creates an all-air chunk at `position` that still needs a mesh.
    pub fn new(position: Point3<i32>, mesh_handle: MeshHandle) -> Self {
        let mut flags = ChunkFlags::default();
        flags.set_needs_rebuild(true);
        Chunk {
            position,
            blocks: vec![Block::air(); CHUNK_SIZE as usize],
            flags,
            block_tree: BlockTree::new(CHUNK_DIMENSION),
            mesh_handle,
            revision: 0,
            loaded: false,
        }
    }

    #[inline]
    fn index(x: usize, y: usize, z: usize) -> usize {
        let d = CHUNK_DIMENSION as usize;
        x + d * (y + d * z)
    }

    /// Reads the block at an in-range local coordinate without bounds conversion.
    ///
    /// # Panics
    /// Panics if any component is `>= CHUNK_DIMENSION`.
    #[inline]
    pub fn block_at(&self, x: usize, y: usize, z: usize) -> &Block {
        &self.blocks[Self::index(x, y, z)]
    }

    /// Returns the block at a chunk-local coordinate, or `None` if out of range.
    pub fn get_block(&self, local: Point3<i32>) -> Option<Block> {
        in_cube(local, CHUNK_DIMENSION)
            .then(|| *self.block_at(local.x as usize, local.y as usize, local.z as usize))
    }

    /// Writes a block, keeps the block tree in step and marks the mesh stale.
    ///
    /// # Returns
    /// `false` if `local` is outside the chunk.
    pub fn set_block(&mut self, local: Point3<i32>, block: Block) -> bool {
        if !in_cube(local, CHUNK_DIMENSION) {
            return false;
        }
        let index = Self::index(local.x as usize, local.y as usize, local.z as usize);
        self.blocks[index] = block;
        if block.active {
            self.block_tree.insert(local);
        } else {
            self.block_tree.remove(local);
        }
        self.invalidate();
        true
    }

    pub fn apply_update(&mut self, update: &BlockUpdate) -> bool {
        self.set_block(update.local_position, update.block())
    }

    /// Sets every block of the chunk to `block`.
    pub fn fill(&mut self, block: Block) {
        self.blocks.fill(block);
        self.loaded = true;
        self.rebuild_block_tree();
        self.flags.clear_occlusion();
        self.invalidate();
    }

    /// Reassigns the chunk to a new world coordinate. Block data is left as is until
    /// the next load, and the chunk reports itself unloaded until then.
    pub fn move_to(&mut self, position: Point3<i32>) {
        self.position = position;
        self.loaded = false;
        self.flags.clear_occlusion();
        self.flags.set_empty(false);
        self.invalidate();
    }

    /// Runs the greedy mesher over the chunk, refreshing the boundary occlusion bits
    /// and the empty flag. The returned buffers still have to be finalized on the
    /// thread that owns the render sink.
    pub fn rebuild(&mut self) -> ChunkMesher {
        let mut mesher = ChunkMesher::new(self.mesh_handle, self.revision, self.world_origin());
        let occludes = greedy::greedy_mesh(self, &mut mesher);
        for side in BlockSide::all() {
            self.flags.set_occludes(side, occludes[side as usize]);
        }
        self.flags.set_empty(mesher.is_empty());
        mesher
    }

    /// Marks the current mesh as matching the block data.
    pub fn set_rebuilt(&mut self) {
        self.flags.set_needs_rebuild(false);
    }

    /// A chunk is drawn only with an up to date, non-empty mesh.
    pub fn should_render(&self) -> bool {
        !self.flags.needs_rebuild() && !self.flags.is_empty()
    }

    pub fn flags(&self) -> &ChunkFlags {
        &self.flags
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn set_empty(&mut self, empty: bool) {
        self.flags.set_empty(empty);
    }

    pub fn needs_rebuild(&self) -> bool {
        self.flags.needs_rebuild()
    }

    pub fn occludes(&self, side: BlockSide) -> bool {
        self.flags.occludes(side)
    }

    pub fn block_tree(&self) -> &BlockTree {
        &self.block_tree
    }

    pub fn mesh_handle(&self) -> MeshHandle {
        self.mesh_handle
    }

    /// Whether the block data belongs to the current position.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Counter bumped by every load, move and block write.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// World-space position of block `(0, 0, 0)`'s centre, used as the mesh instance offset.
    pub fn world_origin(&self) -> Vector3<f32> {
        Vector3::new(
            (self.position.x * CHUNK_DIMENSION) as f32,
            (self.position.y * CHUNK_DIMENSION) as f32,
            (self.position.z * CHUNK_DIMENSION) as f32,
        )
    }

    /// Iterates over the active blocks of the chunk.
    pub fn active_blocks(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }

    /// Number of blocks of the given material, active or not.
    pub fn count_material(&self, block_type: BlockType) -> usize {
        self.blocks
            .iter()
            .filter(|block| block.block_type == block_type)
            .count()
    }

    fn rebuild_block_tree(&mut self) {
        self.block_tree.clear();
        let active: Vec<Point3<i32>> = ChunkBlockIterator::new(self)
            .map(|(local, _)| local)
            .collect();
        for local in active {
            self.block_tree.insert(local);
        }
    }

    fn invalidate(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        self.flags.set_needs_rebuild(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk() -> Chunk {
        Chunk::new(Point3::new(0, 0, 0), MeshHandle(0))
    }

    #[test]
    fn new_chunk_needs_rebuild_and_is_not_rendered() {
        let chunk = chunk();
        assert!(chunk.needs_rebuild());
        assert!(!chunk.should_render());
        assert!(chunk.block_tree().is_empty());
    }

    #[test]
    fn out_of_range_access_is_rejected() {
        let mut chunk = chunk();
        assert_eq!(chunk.get_block(Point3::new(16, 0, 0)), None);
        assert_eq!(chunk.get_block(Point3::new(0, -1, 0)), None);
        assert!(!chunk.set_block(Point3::new(0, 0, 16), Block::new(BlockType::STONE)));
        assert_eq!(chunk.revision(), 0);
    }

    #[test]
    fn set_block_tracks_block_tree_and_revision() {
        let mut chunk = chunk();
        let local = Point3::new(2, 3, 4);

        assert!(chunk.set_block(local, Block::new(BlockType::STONE)));
        assert_eq!(chunk.get_block(local), Some(Block::new(BlockType::STONE)));
        assert!(chunk.block_tree().contains(local));
        assert_eq!(chunk.revision(), 1);

        chunk.set_block(local, Block::air());
        assert!(!chunk.block_tree().contains(local));
        assert!(chunk.block_tree().is_empty());
        assert_eq!(chunk.revision(), 2);
    }

    #[test]
    fn inactive_block_keeps_its_material() {
        let mut chunk = chunk();
        let local = Point3::new(1, 1, 1);
        chunk.set_block(
            local,
            Block {
                active: false,
                block_type: BlockType::DIRT,
            },
        );
        let block = chunk.get_block(local).unwrap();
        assert!(!block.active);
        assert_eq!(block.block_type, BlockType::DIRT);
        assert!(!chunk.block_tree().contains(local));
    }

    #[test]
    fn rebuild_and_finalize_cycle_controls_rendering() {
        let mut chunk = chunk();
        chunk.fill(Block::new(BlockType::STONE));
        let mesher = chunk.rebuild();
        assert_eq!(mesher.quad_count(), 6);
        assert!(!chunk.is_empty());
        for side in BlockSide::all() {
            assert!(chunk.occludes(side));
        }

        chunk.set_rebuilt();
        assert!(chunk.should_render());

        chunk.set_block(Point3::new(0, 0, 0), Block::air());
        assert!(!chunk.should_render());
        chunk.rebuild();
        assert!(!chunk.occludes(BlockSide::LEFT));
        assert!(chunk.occludes(BlockSide::RIGHT));
    }

    #[test]
    fn empty_chunk_rebuilds_to_empty_flag() {
        let mut chunk = chunk();
        let mesher = chunk.rebuild();
        assert!(mesher.is_empty());
        assert!(chunk.is_empty());
        chunk.set_rebuilt();
        assert!(!chunk.should_render());
    }

    #[test]
    fn move_to_invalidates() {
        let mut chunk = chunk();
        chunk.set_rebuilt();
        chunk.move_to(Point3::new(-2, 0, 5));
        assert_eq!(chunk.position, Point3::new(-2, 0, 5));
        assert!(chunk.needs_rebuild());
        assert!(!chunk.is_loaded());
        assert_eq!(chunk.world_origin(), Vector3::new(-32.0, 0.0, 80.0));
    }
}
