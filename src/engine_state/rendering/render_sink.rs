//! # Render Sink
//!
//! The boundary between chunk management and whatever owns the GPU. The chunk manager
//! never touches graphics state directly: finished meshes are pushed through
//! [`RenderSink::upload_mesh`] and each visible chunk is drawn with
//! [`RenderSink::draw_mesh`]. Both are only ever called from the thread that calls
//! `ChunkManager::update` and `ChunkManager::render_chunks`.

use std::collections::HashMap;

use cgmath::Vector3;

use super::meshing::MeshBuffers;
use crate::engine_state::camera_state::camera::CameraView;

/// Opaque identifier of one chunk's GPU mesh. Stable for the lifetime of a pool slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub usize);

/// Receives mesh uploads and draw calls.
pub trait RenderSink {
    /// Where draws go (a framebuffer, a command encoder, ...).
    type Target;
    /// Program used for drawing chunk meshes.
    type Shader;

    /// Replaces the mesh stored under `handle`.
    fn upload_mesh(&mut self, handle: MeshHandle, mesh: &MeshBuffers);

    /// Draws the mesh stored under `handle`.
    fn draw_mesh(
        &mut self,
        target: &mut Self::Target,
        shader: &Self::Shader,
        handle: MeshHandle,
        camera: &CameraView,
    );
}

/// What a [`CountingRenderSink`] remembers about the latest upload for a handle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UploadRecord {
    pub vertices: usize,
    pub indices: usize,
    pub offset: Vector3<f32>,
}

/// Headless sink that records uploads and collects draw calls into its target list.
#[derive(Default, Debug)]
pub struct CountingRenderSink {
    pub meshes: HashMap<MeshHandle, UploadRecord>,
    pub upload_count: usize,
    /// Vertex and index bytes pushed through every upload so far.
    pub bytes_uploaded: usize,
    pub draw_count: usize,
}

impl CountingRenderSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of the index counts of every stored mesh.
    pub fn total_indices(&self) -> usize {
        self.meshes.values().map(|record| record.indices).sum()
    }
}

impl RenderSink for CountingRenderSink {
    type Target = Vec<MeshHandle>;
    type Shader = ();

    fn upload_mesh(&mut self, handle: MeshHandle, mesh: &MeshBuffers) {
        self.meshes.insert(
            handle,
            UploadRecord {
                vertices: mesh.vertices.len(),
                indices: mesh.indices.len(),
                offset: mesh.offset,
            },
        );
        self.upload_count += 1;
        self.bytes_uploaded += mesh.vertex_bytes().len() + mesh.index_bytes().len();
    }

    fn draw_mesh(
        &mut self,
        target: &mut Self::Target,
        _shader: &Self::Shader,
        handle: MeshHandle,
        _camera: &CameraView,
    ) {
        target.push(handle);
        self.draw_count += 1;
    }
}
