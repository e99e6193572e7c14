//! Conversions between world block coordinates, chunk coordinates and chunk-local
//! coordinates. World coordinates may be negative; decomposition always uses Euclidean
//! division so that local coordinates stay in `0..CHUNK_DIMENSION`.

use cgmath::Point3;

use super::chunk::CHUNK_DIMENSION;

/// Lowest chunk coordinate whose blocks all have `i32` world coordinates.
pub const MIN_CHUNK_COORD: i32 = i32::MIN / CHUNK_DIMENSION;
/// Highest chunk coordinate whose blocks all have `i32` world coordinates.
pub const MAX_CHUNK_COORD: i32 = i32::MAX / CHUNK_DIMENSION;

/// Splits a world block coordinate into `(chunk coordinate, chunk-local coordinate)`.
pub fn decompose(world: Point3<i32>) -> (Point3<i32>, Point3<i32>) {
    let chunk = world.map(|c| c.div_euclid(CHUNK_DIMENSION));
    let local = world.map(|c| c.rem_euclid(CHUNK_DIMENSION));
    (chunk, local)
}

/// Inverse of [`decompose`].
pub fn compose(chunk: Point3<i32>, local: Point3<i32>) -> Point3<i32> {
    Point3::new(
        chunk.x * CHUNK_DIMENSION + local.x,
        chunk.y * CHUNK_DIMENSION + local.y,
        chunk.z * CHUNK_DIMENSION + local.z,
    )
}

pub fn point_to_f32(p: Point3<i32>) -> Point3<f32> {
    Point3::new(p.x as f32, p.y as f32, p.z as f32)
}

/// Whether `local` lies inside a cube of `dimension` cells starting at the origin.
pub fn in_cube(local: Point3<i32>, dimension: i32) -> bool {
    (0..dimension).contains(&local.x)
        && (0..dimension).contains(&local.y)
        && (0..dimension).contains(&local.z)
}
