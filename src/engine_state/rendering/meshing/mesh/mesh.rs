//! Mesh buffers and the accumulator that fills them.
//!
//! A `ChunkMesher` is created on a mesh worker, filled by the greedy sweep and then moved
//! through the upload queue to the thread that owns the render sink, where
//! [`ChunkMesher::finalize`] hands the buffers over and marks the chunk as rebuilt.

use cgmath::{Point3, Vector3};

use super::face::FaceDescriptor;
use crate::engine_state::{
    rendering::{
        render_sink::{MeshHandle, RenderSink},
        Vertex,
    },
    voxels::chunk::Chunk,
};

/// Shift applied to every quad corner so that block centres land on integer coordinates.
const STATIC_OFFSET: f32 = 0.5;

/// Triangle list for one chunk, plus the per-instance world offset it is drawn at.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshBuffers {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// World position of the chunk's block `(0, 0, 0)`.
    pub offset: Vector3<f32>,
}

impl Default for MeshBuffers {
    fn default() -> Self {
        MeshBuffers {
            vertices: Vec::new(),
            indices: Vec::new(),
            offset: Vector3::new(0.0, 0.0, 0.0),
        }
    }
}

impl MeshBuffers {
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Accumulates quads for one chunk rebuild.
#[derive(Debug)]
pub struct ChunkMesher {
    handle: MeshHandle,
    revision: u64,
    buffers: MeshBuffers,
    quads: usize,
    merged_faces: usize,
}

impl ChunkMesher {
    /// Starts an empty mesh for the chunk behind `handle` at block-data `revision`.
    pub fn new(handle: MeshHandle, revision: u64, offset: Vector3<f32>) -> Self {
        ChunkMesher {
            handle,
            revision,
            buffers: MeshBuffers {
                offset,
                ..MeshBuffers::default()
            },
            quads: 0,
            merged_faces: 0,
        }
    }

    /// Appends one quad.
    ///
    /// # Arguments
    /// * `corners` - `[origin, origin + du, origin + du + dv, origin + dv]` in block-corner
    ///   space, where `du`/`dv` span the quad's `width` and `height`
    /// * `face` - Material and side; the side provides the normal
    /// * `back_face` - Whether the quad faces the negative axis, which flips winding
    pub fn add_quad(
        &mut self,
        corners: [Point3<f32>; 4],
        width: usize,
        height: usize,
        face: FaceDescriptor,
        back_face: bool,
    ) {
        let normal = face.side.normal_f32();
        let color = face.block_type.color();
        let shift = Vector3::new(STATIC_OFFSET, STATIC_OFFSET, STATIC_OFFSET);
        let base = self.buffers.vertices.len() as u32;

        for corner in [corners[0], corners[3], corners[1], corners[2]] {
            self.buffers
                .vertices
                .push(Vertex::new(corner - shift, normal, color));
        }

        let pattern: [u32; 6] = if back_face {
            [2, 0, 1, 1, 3, 2]
        } else {
            [2, 3, 1, 1, 0, 2]
        };
        self.buffers
            .indices
            .extend(pattern.iter().map(|i| base + i));

        self.quads += 1;
        self.merged_faces += width * height;
    }

    pub fn is_empty(&self) -> bool {
        self.quads == 0
    }

    pub fn quad_count(&self) -> usize {
        self.quads
    }

    /// Number of unit block faces covered by all quads so far.
    pub fn merged_face_count(&self) -> usize {
        self.merged_faces
    }

    pub fn num_vertices(&self) -> usize {
        self.buffers.vertices.len()
    }

    pub fn buffers(&self) -> &MeshBuffers {
        &self.buffers
    }

    pub fn handle(&self) -> MeshHandle {
        self.handle
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Uploads the buffers through `sink` and clears the chunk's rebuild flag.
    ///
    /// # Returns
    /// `false`, uploading nothing, when the chunk changed after these buffers were built.
    /// A newer rebuild is already queued in that case.
    pub fn finalize<S: RenderSink>(self, chunk: &mut Chunk, sink: &mut S) -> bool {
        if chunk.revision() != self.revision || chunk.mesh_handle() != self.handle {
            log::debug!(
                "Discarding stale mesh for chunk {:?} (built at revision {}, now {})",
                chunk.position,
                self.revision,
                chunk.revision()
            );
            return false;
        }
        sink.upload_mesh(self.handle, &self.buffers);
        chunk.set_rebuilt();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::{
        rendering::render_sink::CountingRenderSink,
        voxels::block::{block_side::BlockSide, block_type::BlockType, Block},
    };
    use cgmath::InnerSpace;

    fn unit_quad() -> [Point3<f32>; 4] {
        [
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
        ]
    }

    fn triangle_normal(mesher: &ChunkMesher, first: usize) -> Vector3<f32> {
        let buffers = mesher.buffers();
        let p = |i: usize| buffers.vertices[buffers.indices[first + i] as usize].position();
        (p(1) - p(0)).cross(p(2) - p(0)).normalize()
    }

    #[test]
    fn quad_adds_four_vertices_and_two_triangles() {
        let mut mesher = ChunkMesher::new(MeshHandle(0), 0, Vector3::new(0.0, 0.0, 0.0));
        assert!(mesher.is_empty());
        mesher.add_quad(
            unit_quad(),
            1,
            1,
            FaceDescriptor::new(BlockType::STONE, BlockSide::RIGHT),
            false,
        );
        assert_eq!(mesher.num_vertices(), 4);
        assert_eq!(mesher.buffers().indices.len(), 6);
        assert_eq!(mesher.quad_count(), 1);
        assert_eq!(
            mesher.buffers().vertices[0].position(),
            Point3::new(0.5, -0.5, -0.5)
        );
        assert_eq!(mesher.buffers().vertex_bytes().len(), 4 * 36);
    }

    #[test]
    fn winding_matches_face_direction() {
        let mut mesher = ChunkMesher::new(MeshHandle(0), 0, Vector3::new(0.0, 0.0, 0.0));
        mesher.add_quad(
            unit_quad(),
            1,
            1,
            FaceDescriptor::new(BlockType::STONE, BlockSide::RIGHT),
            false,
        );
        mesher.add_quad(
            unit_quad(),
            1,
            1,
            FaceDescriptor::new(BlockType::STONE, BlockSide::LEFT),
            true,
        );
        for first in [0, 3] {
            assert!((triangle_normal(&mesher, first) - Vector3::unit_x()).magnitude() < 1e-6);
        }
        for first in [6, 9] {
            assert!((triangle_normal(&mesher, first) + Vector3::unit_x()).magnitude() < 1e-6);
        }
    }

    #[test]
    fn finalize_uploads_and_clears_rebuild_flag() {
        let mut chunk = Chunk::new(Point3::new(1, 0, 0), MeshHandle(3));
        chunk.set_block(Point3::new(0, 0, 0), Block::new(BlockType::GRASS));
        let mesher = chunk.rebuild();
        let mut sink = CountingRenderSink::new();

        assert!(mesher.finalize(&mut chunk, &mut sink));
        assert!(!chunk.needs_rebuild());
        let record = sink.meshes[&MeshHandle(3)];
        assert_eq!(record.vertices, 24);
        assert_eq!(record.offset, Vector3::new(16.0, 0.0, 0.0));
    }

    #[test]
    fn stale_mesh_is_discarded() {
        let mut chunk = Chunk::new(Point3::new(0, 0, 0), MeshHandle(0));
        chunk.set_block(Point3::new(0, 0, 0), Block::new(BlockType::GRASS));
        let mesher = chunk.rebuild();
        chunk.set_block(Point3::new(1, 0, 0), Block::new(BlockType::GRASS));
        let mut sink = CountingRenderSink::new();

        assert!(!mesher.finalize(&mut chunk, &mut sink));
        assert!(chunk.needs_rebuild());
        assert_eq!(sink.upload_count, 0);
    }
}
