use cgmath::{Point3, Vector3};

use super::{
    aabb::Aabb,
    octree::{Octree, RayHit},
};

/// Where a ray first touches an active block, in chunk-local block space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BlockHit {
    /// Integer coordinate of the block that was hit.
    pub coord: Point3<i32>,
    /// The entry point on that block's surface.
    pub position: Point3<f32>,
}

impl RayHit for BlockHit {
    fn position(&self) -> Point3<f32> {
        self.position
    }
}

/// Sparse index of the active blocks of one chunk.
///
/// Block `i` occupies `[i - 0.5, i + 0.5]` on each axis, so the root spans
/// `[-0.5, size - 0.5]` where `size` is the chunk dimension rounded up to a power of two.
#[derive(Clone, Debug)]
pub struct BlockTree {
    octree: Octree<()>,
}

impl BlockTree {
    pub fn new(dimension: i32) -> Self {
        let size = (dimension.max(1) as u32).next_power_of_two();
        let max_level = size.trailing_zeros();
        let max = size as f32 - 0.5;
        BlockTree {
            octree: Octree::new(
                Aabb::new(Point3::new(-0.5, -0.5, -0.5), Point3::new(max, max, max)),
                max_level,
            ),
        }
    }

    pub fn insert(&mut self, coord: Point3<i32>) -> bool {
        self.octree.insert(coord, ())
    }

    pub fn remove(&mut self, coord: Point3<i32>) -> bool {
        self.octree.remove(coord)
    }

    pub fn contains(&self, coord: Point3<i32>) -> bool {
        self.octree.get(coord).is_some()
    }

    pub fn clear(&mut self) {
        self.octree.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.octree.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.octree.node_count()
    }

    /// Nearest active block in front of `origin` along `direction`.
    ///
    /// A block only counts when the ray enters it at a strictly positive parameter, so a
    /// ray starting inside or behind a block ignores that block.
    pub fn ray_intersect(&self, origin: Point3<f32>, direction: Vector3<f32>) -> Option<BlockHit> {
        self.octree.ray_query(origin, direction, |coord, _, t_near| {
            (t_near > 0.0).then(|| BlockHit {
                coord,
                position: origin + direction * t_near,
            })
        })
    }
}
