//! # Terrain Sources
//!
//! Height-field providers consulted when a chunk is (re)loaded. A source maps a world
//! column `(x, z)` to the height of its surface block; everything below is filled,
//! everything above is air.
//!
//! Load workers call into the source concurrently, so implementations must be
//! `Send + Sync`.

use noise::{NoiseFn, Perlin};

use crate::config::TerrainConfig;

/// Supplies the surface height of every world column.
pub trait TerrainSource: Send + Sync {
    fn height(&self, world_x: i32, world_z: i32) -> i32;
}

/// Rolling hills from a single octave of 3D Perlin noise, sampled at
/// `(x * horizontal_scale, z * horizontal_scale, sample_y)`.
///
/// The permutation table is immutable after construction, so concurrent samples need
/// no locking.
pub struct PerlinTerrain {
    perlin: Perlin,
    horizontal_scale: f64,
    vertical_scale: f64,
    sample_y: f64,
}

impl PerlinTerrain {
    pub fn new(config: &TerrainConfig) -> Self {
        PerlinTerrain {
            perlin: Perlin::new(config.seed),
            horizontal_scale: config.horizontal_scale,
            vertical_scale: config.vertical_scale,
            sample_y: config.sample_y,
        }
    }

    fn to_perlin_pos(&self, world_x: i32, world_z: i32) -> [f64; 3] {
        [
            world_x as f64 * self.horizontal_scale,
            world_z as f64 * self.horizontal_scale,
            self.sample_y,
        ]
    }
}

impl TerrainSource for PerlinTerrain {
    fn height(&self, world_x: i32, world_z: i32) -> i32 {
        let value = self.perlin.get(self.to_perlin_pos(world_x, world_z));
        (value * self.vertical_scale) as i32
    }
}

/// A perfectly level world, handy for tests and benchmarks.
#[derive(Copy, Clone, Debug)]
pub struct FlatTerrain {
    pub height: i32,
}

impl TerrainSource for FlatTerrain {
    fn height(&self, _world_x: i32, _world_z: i32) -> i32 {
        self.height
    }
}
