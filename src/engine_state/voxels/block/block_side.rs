//! # Block Side Module
//!
//! The six axis-aligned faces of a voxel block. Used for mesh normals, chunk boundary
//! occlusion flags and for reporting which face a picking ray entered through.

use cgmath::Vector3;

/// One of the six faces of a block, named after the direction its normal points.
///
/// The discriminants are stable and index the per-side occlusion bits of a chunk.
/// The order is: [LEFT, RIGHT, BOTTOM, TOP, FRONT, BACK]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// Facing negative X
    LEFT = 0,

    /// Facing positive X
    RIGHT = 1,

    /// Facing negative Y
    BOTTOM = 2,

    /// Facing positive Y
    TOP = 3,

    /// Facing negative Z
    FRONT = 4,

    /// Facing positive Z
    BACK = 5,
}

impl BlockSide {
    /// Returns all six faces in discriminant order: -X, +X, -Y, +Y, -Z, +Z.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::LEFT,
            BlockSide::RIGHT,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::FRONT,
            BlockSide::BACK,
        ]
    }

    /// The face perpendicular to `axis` (0 = X, 1 = Y, 2 = Z) on the given side.
    ///
    /// # Panics
    /// Panics if `axis` is greater than 2.
    pub fn from_axis(axis: usize, positive: bool) -> BlockSide {
        match (axis, positive) {
            (0, false) => BlockSide::LEFT,
            (0, true) => BlockSide::RIGHT,
            (1, false) => BlockSide::BOTTOM,
            (1, true) => BlockSide::TOP,
            (2, false) => BlockSide::FRONT,
            (2, true) => BlockSide::BACK,
            _ => panic!("axis {axis} out of range"),
        }
    }

    /// The face on the other side of the block.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::LEFT => BlockSide::RIGHT,
            BlockSide::RIGHT => BlockSide::LEFT,
            BlockSide::BOTTOM => BlockSide::TOP,
            BlockSide::TOP => BlockSide::BOTTOM,
            BlockSide::FRONT => BlockSide::BACK,
            BlockSide::BACK => BlockSide::FRONT,
        }
    }

    /// Unit integer normal of this face.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::FRONT => Vector3::new(0, 0, -1),
            BlockSide::BACK => Vector3::new(0, 0, 1),
        }
    }

    pub fn normal_f32(self) -> Vector3<f32> {
        let n = self.normal();
        Vector3::new(n.x as f32, n.y as f32, n.z as f32)
    }

    /// Picks the face whose normal best matches `offset`, the vector from a block's
    /// centre to a point on its surface.
    ///
    /// Exact ties go to the earlier face in [`BlockSide::all`] order.
    pub fn dominant(offset: Vector3<f32>) -> BlockSide {
        let mut best = BlockSide::LEFT;
        let mut best_dot = f32::NEG_INFINITY;
        for side in BlockSide::all() {
            let n = side.normal_f32();
            let dot = n.x * offset.x + n.y * offset.y + n.z * offset.z;
            if dot > best_dot {
                best_dot = dot;
                best = side;
            }
        }
        best
    }
}
