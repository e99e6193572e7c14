use cgmath::{EuclideanSpace, Point3, Vector3};

use crate::{
    core::MtResource,
    engine_state::voxels::{
        chunk::{Chunk, CHUNK_DIMENSION},
        coordinates::point_to_f32,
    },
};

use super::{
    aabb::Aabb,
    octree::{Octree, RayHit},
};

/// A ray hit resolved down to a single block of a resident chunk.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChunkRayHit {
    /// Window-local coordinate of the chunk that was hit.
    pub chunk: Point3<i32>,
    /// Pool slot holding that chunk.
    pub slot: usize,
    /// Hit point in window-local chunk space.
    pub position: Point3<f32>,
    /// Chunk-local coordinate of the block that was hit.
    pub block: Point3<i32>,
    /// Hit point in the chunk's block space.
    pub block_position: Point3<f32>,
}

impl RayHit for ChunkRayHit {
    fn position(&self) -> Point3<f32> {
        self.position
    }
}

/// Index of the resident chunks by window-local coordinate, mapping to pool slots.
///
/// Units are chunks, but the root is shifted by half a block (`0.5 / CHUNK_DIMENSION`)
/// so that chunk `c`'s leaf lines up exactly with its block tree, whose block centres sit
/// on integers.
#[derive(Clone, Debug)]
pub struct ChunkTree {
    octree: Octree<usize>,
}

impl ChunkTree {
    pub fn new(load_distance: i32) -> Self {
        let size = (load_distance.max(1) as u32).next_power_of_two();
        let max_level = size.trailing_zeros();
        let half_block = 0.5 / CHUNK_DIMENSION as f32;
        let max = size as f32 - half_block;
        ChunkTree {
            octree: Octree::new(
                Aabb::new(
                    Point3::new(-half_block, -half_block, -half_block),
                    Point3::new(max, max, max),
                ),
                max_level,
            ),
        }
    }

    /// Points the leaf at `local` to pool slot `slot`, replacing the previous slot.
    ///
    /// The window always covers every local position, so leaves are only ever
    /// overwritten, never removed.
    pub fn insert(&mut self, local: Point3<i32>, slot: usize) -> bool {
        self.octree.insert(local, slot)
    }

    pub fn slot_at(&self, local: Point3<i32>) -> Option<usize> {
        self.octree.get(local)
    }

    pub fn is_empty(&self) -> bool {
        self.octree.is_empty()
    }

    /// Finds the first active block hit by the ray, descending from chunks into their
    /// block trees.
    ///
    /// `origin` is in window-local chunk space. Each chunk leaf the ray crosses is read
    /// locked long enough to query its block tree. Chunks flagged empty and recycled
    /// chunks whose load has not run yet are skipped.
    pub fn ray_intersect(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        chunks: &[MtResource<Chunk>],
    ) -> Option<ChunkRayHit> {
        let scale = CHUNK_DIMENSION as f32;
        self.octree.ray_query(origin, direction, |local, slot, _| {
            let chunk = chunks.get(*slot)?.get();
            if chunk.is_empty() || !chunk.is_loaded() {
                return None;
            }
            let chunk_origin = point_to_f32(local);
            let block_origin = Point3::from_vec((origin - chunk_origin) * scale);
            let hit = chunk.block_tree().ray_intersect(block_origin, direction)?;
            Some(ChunkRayHit {
                chunk: local,
                slot: *slot,
                position: chunk_origin + hit.position.to_vec() / scale,
                block: hit.coord,
                block_position: hit.position,
            })
        })
    }
}
