use cgmath::{Point3, Vector3};

/// Axis-aligned box, inclusive on both ends.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Aabb { min, max }
    }

    /// A cube with its minimum corner at `min`.
    pub fn cube(min: Point3<f32>, side: f32) -> Self {
        Aabb {
            min,
            max: Point3::new(min.x + side, min.y + side, min.z + side),
        }
    }

    pub fn center(&self) -> Point3<f32> {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Inclusive containment; points on a shared face belong to both neighbours.
    pub fn contains(&self, p: Point3<f32>) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// One of the eight boxes obtained by splitting at the centre.
    ///
    /// Bit 0 of `index` selects the upper half in X, bit 1 in Y, bit 2 in Z.
    pub fn octant(&self, index: usize) -> Aabb {
        let c = self.center();
        let (x0, x1) = if index & 1 != 0 { (c.x, self.max.x) } else { (self.min.x, c.x) };
        let (y0, y1) = if index & 2 != 0 { (c.y, self.max.y) } else { (self.min.y, c.y) };
        let (z0, z1) = if index & 4 != 0 { (c.z, self.max.z) } else { (self.min.z, c.z) };
        Aabb::new(Point3::new(x0, y0, z0), Point3::new(x1, y1, z1))
    }

    /// Slab test against the infinite line `origin + t * direction`.
    ///
    /// Returns the entry and exit parameters `(t_near, t_far)`. Either may be negative:
    /// callers decide whether a box behind the origin counts.
    pub fn intersect_ray(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
    ) -> Option<(f32, f32)> {
        let mut t_min = [0.0f32; 3];
        let mut t_max = [0.0f32; 3];
        for axis in 0..3 {
            let inv = 1.0 / direction[axis];
            let a = (self.min[axis] - origin[axis]) * inv;
            let b = (self.max[axis] - origin[axis]) * inv;
            t_min[axis] = a.min(b);
            t_max[axis] = a.max(b);
        }

        if t_min[0] > t_max[1] || t_min[1] > t_max[0] {
            return None;
        }
        let mut near = t_min[0].max(t_min[1]);
        let mut far = t_max[0].min(t_max[1]);

        if near > t_max[2] || t_min[2] > far {
            return None;
        }
        near = near.max(t_min[2]);
        far = far.min(t_max[2]);

        Some((near, far))
    }
}
