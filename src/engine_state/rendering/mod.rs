//! Rendering-side data for the voxel engine.
//!
//! This module turns chunk block data into meshes and defines the seam through which
//! those meshes reach a GPU. Nothing here talks to a graphics API: uploads and draws go
//! through the [`render_sink::RenderSink`] trait implemented by the host application.

pub mod meshing;
pub mod render_sink;
pub mod tasks;
mod vertex;

// Re-export commonly used types
pub use render_sink::{MeshHandle, RenderSink};
pub use vertex::Vertex;
