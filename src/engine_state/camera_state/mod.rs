//! # Camera State
//!
//! Camera positioning and the per-frame view data used for chunk streaming, frustum
//! culling and mouse picking.
//!
//! ## Core Components
//! - `Camera` / `Projection`: first-person camera and its perspective projection
//! - `CameraView`: inverse view, view-projection and frustum for one frame
//! - `Frustum`: six clip planes with a conservative cube test

pub mod camera;
pub mod frustum;
