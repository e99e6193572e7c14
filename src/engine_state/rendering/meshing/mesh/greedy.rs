//! Greedy meshing for voxel chunks.
//!
//! For each axis and each face direction the chunk is swept one boundary plane at a time.
//! Every plane produces a `CHUNK_DIMENSION²` mask of visible faces keyed on
//! [`FaceDescriptor`]; the mask is then covered with as few rectangles as possible by
//! growing each unclaimed cell first along `u` and then along `v`.
//!
//! A face is visible where an active block meets an inactive one or the chunk boundary.
//! Neighbouring chunks are not consulted, so boundary faces are always emitted.

use cgmath::Point3;

use super::{face::FaceDescriptor, mesh::ChunkMesher};
use crate::engine_state::voxels::{
    block::block_side::BlockSide,
    chunk::{Chunk, CHUNK_DIMENSION},
};

const N: i32 = CHUNK_DIMENSION;

fn is_active(chunk: &Chunk, x: [i32; 3]) -> bool {
    chunk
        .block_at(x[0] as usize, x[1] as usize, x[2] as usize)
        .active
}

fn corner(x: [i32; 3]) -> Point3<f32> {
    Point3::new(x[0] as f32, x[1] as f32, x[2] as f32)
}

/// Emits the greedy mesh of `chunk` into `mesher`.
///
/// # Returns
/// For each [`BlockSide`] (indexed by discriminant), whether the chunk's boundary layer
/// on that side is completely made of active blocks.
pub fn greedy_mesh(chunk: &Chunk, mesher: &mut ChunkMesher) -> [bool; 6] {
    let n = N as usize;
    let mut occludes = [false; 6];
    let mut mask: Vec<Option<FaceDescriptor>> = vec![None; n * n];

    for back_face in [true, false] {
        for d in 0..3 {
            let u = (d + 1) % 3;
            let v = (d + 2) % 3;
            let side = BlockSide::from_axis(d, !back_face);

            let mut x = [0i32; 3];
            let mut q = [0i32; 3];
            q[d] = 1;

            x[d] = -1;
            while x[d] < N {
                // Faces on the plane between slice x[d] and slice x[d] + 1.
                let mut filled = 0;
                for j in 0..N {
                    x[v] = j;
                    for i in 0..N {
                        x[u] = i;
                        let behind = x[d] >= 0 && is_active(chunk, x);
                        let ahead_pos = [x[0] + q[0], x[1] + q[1], x[2] + q[2]];
                        let ahead = x[d] < N - 1 && is_active(chunk, ahead_pos);

                        let owner = match (back_face, behind, ahead) {
                            (true, false, true) => Some(ahead_pos),
                            (false, true, false) => Some(x),
                            _ => None,
                        };
                        let cell = owner.map(|p| {
                            let block = chunk.block_at(p[0] as usize, p[1] as usize, p[2] as usize);
                            FaceDescriptor::new(block.block_type, side)
                        });
                        if cell.is_some() {
                            filled += 1;
                        }
                        mask[(i + j * N) as usize] = cell;
                    }
                }

                let boundary = if back_face { x[d] == -1 } else { x[d] == N - 1 };
                if boundary {
                    occludes[side as usize] = filled == n * n;
                }

                x[d] += 1;

                for j in 0..n {
                    let mut i = 0;
                    while i < n {
                        let Some(face) = mask[i + j * n] else {
                            i += 1;
                            continue;
                        };

                        let mut width = 1;
                        while i + width < n && mask[i + width + j * n] == Some(face) {
                            width += 1;
                        }

                        let mut height = 1;
                        'grow: while j + height < n {
                            for k in 0..width {
                                if mask[i + k + (j + height) * n] != Some(face) {
                                    break 'grow;
                                }
                            }
                            height += 1;
                        }

                        x[u] = i as i32;
                        x[v] = j as i32;
                        let mut du = [0i32; 3];
                        du[u] = width as i32;
                        let mut dv = [0i32; 3];
                        dv[v] = height as i32;

                        let v0 = x;
                        let v1 = [x[0] + du[0], x[1] + du[1], x[2] + du[2]];
                        let v2 = [v1[0] + dv[0], v1[1] + dv[1], v1[2] + dv[2]];
                        let v3 = [x[0] + dv[0], x[1] + dv[1], x[2] + dv[2]];
                        mesher.add_quad(
                            [corner(v0), corner(v1), corner(v2), corner(v3)],
                            width,
                            height,
                            face,
                            back_face,
                        );

                        for l in 0..height {
                            for k in 0..width {
                                mask[i + k + (j + l) * n] = None;
                            }
                        }
                        i += width;
                    }
                }
            }
        }
    }

    occludes
}
