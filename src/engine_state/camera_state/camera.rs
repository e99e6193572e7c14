//! # Camera Implementation
//!
//! ## Key Components
//! - `Camera`: first-person position and orientation
//! - `Projection`: perspective projection settings
//! - `CameraView`: the per-frame snapshot the chunk manager consumes, holding the
//!   inverse view, view-projection and frustum

use cgmath::*;
use std::f32::consts::FRAC_PI_2;

use super::frustum::Frustum;

/// Safe limit for pitch to prevent gimbal lock
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// A first-person camera in 3D space.
///
/// # Fields
/// - `position`: The camera's position in world space
/// - `yaw`: Horizontal rotation (around Y axis) in radians; zero looks down +X
/// - `pitch`: Vertical rotation (around X axis) in radians
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    ///
    /// # Example
    /// ```rust
    /// use cgmath::{Deg, Point3};
    /// use voxel_stream::engine_state::camera_state::camera::Camera;
    ///
    /// let camera = Camera::new(Point3::new(0.0, 20.0, 0.0), Deg(0.0), Deg(-20.0));
    /// assert!(camera.forward().y < 0.0);
    /// ```
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        let mut camera = Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        };
        camera.clamp_pitch();
        camera
    }

    /// Unit vector the camera is looking along.
    pub fn forward(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin).normalize()
    }

    /// Calculates the world-to-view matrix.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }

    /// Moves the camera by `forward` units along its horizontal heading, `right` units
    /// sideways and `up` units vertically.
    pub fn translate(&mut self, forward: f32, right: f32, up: f32) {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let heading = Vector3::new(yaw_cos, 0.0, yaw_sin);
        let side = Vector3::new(-yaw_sin, 0.0, yaw_cos);
        self.position += heading * forward + side * right + Vector3::unit_y() * up;
    }

    /// Turns the camera, clamping pitch short of straight up or down.
    pub fn rotate(&mut self, yaw: Rad<f32>, pitch: Rad<f32>) {
        self.yaw += yaw;
        self.pitch += pitch;
        self.clamp_pitch();
    }

    fn clamp_pitch(&mut self) {
        if self.pitch < -Rad(SAFE_FRAC_PI_2) {
            self.pitch = -Rad(SAFE_FRAC_PI_2);
        } else if self.pitch > Rad(SAFE_FRAC_PI_2) {
            self.pitch = Rad(SAFE_FRAC_PI_2);
        }
    }
}

/// The camera's projection parameters.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    /// Aspect ratio (width / height)
    aspect: f32,
    /// Vertical field of view in radians
    fovy: Rad<f32>,
    /// Near clipping plane distance
    znear: f32,
    /// Far clipping plane distance
    zfar: f32,
}

impl Projection {
    /// Creates a new projection.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    /// * `fovy` - Vertical field of view (can be any type convertible to `Rad<f32>`)
    /// * `znear` - Near clipping plane distance
    /// * `zfar` - Far clipping plane distance
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Updates the aspect ratio for a resized viewport.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Perspective matrix with a `[-1, 1]` clip-space depth range.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Everything the chunk manager needs to know about the camera for one frame.
#[derive(Debug, Clone, Copy)]
pub struct CameraView {
    pub projection: Matrix4<f32>,
    /// Camera-to-world transform; its translation column is the camera position.
    pub inv_view: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub view_projection: Matrix4<f32>,
    pub frustum: Frustum,
}

impl CameraView {
    /// Builds a view from a projection matrix and a camera-to-world transform.
    ///
    /// A singular `inv_view` is replaced by the identity and logged.
    pub fn new(projection: Matrix4<f32>, inv_view: Matrix4<f32>) -> Self {
        let view = inv_view.invert().unwrap_or_else(|| {
            log::warn!("Camera transform is not invertible, using identity view");
            Matrix4::identity()
        });
        let view_projection = projection * view;
        CameraView {
            projection,
            inv_view,
            view,
            view_projection,
            frustum: Frustum::from_matrix(&view_projection),
        }
    }

    pub fn from_camera(camera: &Camera, projection: &Projection) -> Self {
        let view = camera.calc_matrix();
        let inv_view = view.invert().unwrap_or_else(|| {
            log::warn!("Camera view matrix is not invertible, using translation only");
            Matrix4::from_translation(camera.position.to_vec())
        });
        Self::new(projection.calc_matrix(), inv_view)
    }

    /// World-space camera position.
    pub fn position(&self) -> Point3<f32> {
        Point3::from_vec(self.inv_view.w.truncate())
    }

    /// World-space direction of the ray through normalised device coordinates
    /// `(ndc_x, ndc_y)`, each in `[-1, 1]`.
    pub fn ray_direction(&self, ndc_x: f32, ndc_y: f32) -> Vector3<f32> {
        let inv_projection = self.projection.invert().unwrap_or_else(Matrix4::identity);
        let eye = inv_projection * Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
        let eye = Vector4::new(eye.x, eye.y, -1.0, 0.0);
        (self.inv_view * eye).truncate().normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn yaw_zero_looks_down_positive_x() {
        let camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(0.0), Deg(0.0));
        assert_close(camera.forward(), Vector3::unit_x());
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(0.0), Deg(0.0));
        camera.rotate(Rad(0.0), Rad(10.0));
        assert!(camera.pitch.0 < FRAC_PI_2);
    }

    #[test]
    fn translate_moves_along_heading() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(90.0), Deg(0.0));
        camera.translate(2.0, 0.0, 1.0);
        assert_close(camera.position.to_vec(), Vector3::new(0.0, 1.0, 2.0));
    }

    #[test]
    fn view_position_comes_from_inverse_view() {
        let camera = Camera::new(Point3::new(3.0, 40.0, -7.0), Deg(30.0), Deg(-10.0));
        let projection = Projection::new(800, 600, Deg(70.0), 0.1, 500.0);
        let view = CameraView::from_camera(&camera, &projection);
        assert_close(view.position().to_vec(), camera.position.to_vec());
    }

    #[test]
    fn centre_ray_matches_forward() {
        let camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(45.0), Deg(20.0));
        let projection = Projection::new(800, 600, Deg(70.0), 0.1, 500.0);
        let view = CameraView::from_camera(&camera, &projection);
        assert_close(view.ray_direction(0.0, 0.0), camera.forward());
    }

    #[test]
    fn frustum_sees_what_is_in_front() {
        let camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(0.0), Deg(0.0));
        let projection = Projection::new(800, 600, Deg(70.0), 0.1, 500.0);
        let view = CameraView::from_camera(&camera, &projection);
        assert!(view
            .frustum
            .intersects_cube(Point3::new(20.0, -1.0, -1.0), 2.0));
        assert!(!view
            .frustum
            .intersects_cube(Point3::new(-20.0, -1.0, -1.0), 2.0));
    }
}
