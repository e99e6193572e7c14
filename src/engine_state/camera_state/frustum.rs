//! View frustum extracted from a view-projection matrix, used to cull chunks.

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3, Vector4};

/// Plane `normal · p + d = 0`; points with a positive distance are on the inside.
/// The normal is not normalised, only the sign of the distance is meaningful.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vector3<f32>,
    pub d: f32,
}

impl Plane {
    fn from_row(v: Vector4<f32>) -> Self {
        Plane {
            normal: v.truncate(),
            d: v.w,
        }
    }

    pub fn distance(&self, p: Point3<f32>) -> f32 {
        self.normal.dot(p.to_vec()) + self.d
    }
}

/// The six clip planes: left, right, bottom, top, near, far.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extracts the clip planes of a view-projection matrix whose clip volume is
    /// `-w <= x, y, z <= w`.
    pub fn from_matrix(m: &Matrix4<f32>) -> Self {
        let row = |r: usize| Vector4::new(m[0][r], m[1][r], m[2][r], m[3][r]);
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));
        Frustum {
            planes: [
                Plane::from_row(r3 + r0),
                Plane::from_row(r3 - r0),
                Plane::from_row(r3 + r1),
                Plane::from_row(r3 - r1),
                Plane::from_row(r3 + r2),
                Plane::from_row(r3 - r2),
            ],
        }
    }

    /// Conservative cube test: the cube is rejected only when all eight corners lie
    /// outside the same plane.
    pub fn intersects_cube(&self, min: Point3<f32>, side: f32) -> bool {
        let corners = [
            Point3::new(min.x, min.y, min.z),
            Point3::new(min.x + side, min.y, min.z),
            Point3::new(min.x, min.y + side, min.z),
            Point3::new(min.x + side, min.y + side, min.z),
            Point3::new(min.x, min.y, min.z + side),
            Point3::new(min.x + side, min.y, min.z + side),
            Point3::new(min.x, min.y + side, min.z + side),
            Point3::new(min.x + side, min.y + side, min.z + side),
        ];
        self.planes
            .iter()
            .all(|plane| corners.iter().any(|corner| plane.distance(*corner) > 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{perspective, Deg, SquareMatrix};

    #[test]
    fn identity_frustum_is_the_clip_cube() {
        let frustum = Frustum::from_matrix(&Matrix4::identity());
        assert!(frustum.intersects_cube(Point3::new(-0.05, -0.05, -0.05), 0.1));
        assert!(frustum.intersects_cube(Point3::new(0.95, -1.05, 0.95), 0.1));
        assert!(!frustum.intersects_cube(Point3::new(1.45, 0.0, 0.0), 0.1));
        assert!(frustum.intersects_cube(Point3::new(0.5, 0.5, 0.5), 2.0));
        assert!(!frustum.intersects_cube(Point3::new(2.0, 0.0, 0.0), 1.0));
    }

    #[test]
    fn perspective_culls_behind_camera() {
        // Camera at origin looking down -Z.
        let proj = perspective(Deg(70.0), 1.0, 0.1, 100.0);
        let frustum = Frustum::from_matrix(&proj);

        assert!(frustum.intersects_cube(Point3::new(-1.0, -1.0, -20.0), 2.0));
        assert!(!frustum.intersects_cube(Point3::new(-1.0, -1.0, 5.0), 2.0));
        assert!(!frustum.intersects_cube(Point3::new(-1.0, -1.0, -300.0), 2.0));
        // Far off to the side.
        assert!(!frustum.intersects_cube(Point3::new(200.0, 0.0, -20.0), 2.0));
    }

    #[test]
    fn straddling_cube_is_kept() {
        let proj = perspective(Deg(70.0), 1.0, 0.1, 100.0);
        let frustum = Frustum::from_matrix(&proj);
        assert!(frustum.intersects_cube(Point3::new(-8.0, -8.0, -8.0), 16.0));
    }
}
