//! Vertex format handed to the render sink.

use cgmath::{Point3, Vector3};

/// One corner of a chunk mesh quad.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes), chunk-local, block centres on integer coordinates
/// - Normal: 3x f32 (12 bytes)
/// - Colour: 3x f32 (12 bytes), RGB in 0..1
///
/// Total size: 36 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, color: Vector3<f32>) -> Self {
        Vertex {
            position: position.into(),
            normal: normal.into(),
            color: color.into(),
        }
    }

    pub fn position(&self) -> Point3<f32> {
        Point3::from(self.position)
    }
}
