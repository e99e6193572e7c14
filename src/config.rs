//! # Engine Configuration
//!
//! Tunables for the chunk window, the worker pipeline and the terrain generator.
//! Every field has a default, so a JSON document only needs to mention what it overrides:
//!
//! ```json
//! { "load_distance": 6, "mesh_workers": 2, "terrain": { "seed": 42 } }
//! ```

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Number of chunks per axis kept resident when nothing else is configured.
pub const DEFAULT_LOAD_DISTANCE: i32 = 4;

/// Upper bound on chunks sitting in the rebuild queue before loaders back off.
pub const MAX_CHUNKS_TO_REBUILD: usize = 8;

/// Top-level engine configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Edge length `D` of the resident chunk cube.
    pub load_distance: i32,
    pub load_workers: usize,
    pub mesh_workers: usize,
    pub block_update_workers: usize,
    /// Rebuild-queue length at which load workers requeue instead of loading.
    pub max_pending_rebuilds: usize,
    /// Longest time a worker blocks waiting for work before rechecking the running flag.
    pub worker_poll_interval_ms: u64,
    /// Pause after a load worker hands a chunk back because of back-pressure.
    pub backpressure_backoff_ms: u64,
    pub terrain: TerrainConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            load_distance: DEFAULT_LOAD_DISTANCE,
            load_workers: 1,
            mesh_workers: 1,
            block_update_workers: 1,
            max_pending_rebuilds: MAX_CHUNKS_TO_REBUILD,
            worker_poll_interval_ms: 5,
            backpressure_backoff_ms: 1,
            terrain: TerrainConfig::default(),
        }
    }
}

/// Parameters of the Perlin height field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    pub seed: u32,
    /// Multiplier applied to world x/z before sampling noise.
    pub horizontal_scale: f64,
    /// Multiplier applied to the noise value to get a height in blocks.
    pub vertical_scale: f64,
    /// Fixed third coordinate of the noise sample.
    pub sample_y: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            seed: 0,
            horizontal_scale: 0.01,
            vertical_scale: 10.0,
            sample_y: 0.5,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Checks the invariants the chunk manager relies on.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.load_distance < 1 {
            return Err(EngineError::InvalidConfig(format!(
                "load_distance must be at least 1, got {}",
                self.load_distance
            )));
        }
        if self.load_workers == 0 || self.mesh_workers == 0 || self.block_update_workers == 0 {
            return Err(EngineError::InvalidConfig(
                "every pipeline stage needs at least one worker".to_string(),
            ));
        }
        if self.max_pending_rebuilds == 0 {
            return Err(EngineError::InvalidConfig(
                "max_pending_rebuilds must be positive".to_string(),
            ));
        }
        if self.worker_poll_interval_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "worker_poll_interval_ms must be positive".to_string(),
            ));
        }
        if !(self.terrain.horizontal_scale > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "terrain.horizontal_scale must be positive, got {}",
                self.terrain.horizontal_scale
            )));
        }
        Ok(())
    }

    pub fn worker_poll_interval(&self) -> Duration {
        Duration::from_millis(self.worker_poll_interval_ms)
    }

    pub fn backpressure_backoff(&self) -> Duration {
        Duration::from_millis(self.backpressure_backoff_ms)
    }

    /// Number of chunk slots in the pool, `D³`.
    pub fn pool_size(&self) -> usize {
        let d = self.load_distance.max(0) as usize;
        d * d * d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.pool_size(), 64);
        assert_eq!(config.max_pending_rebuilds, MAX_CHUNKS_TO_REBUILD);
    }

    #[test]
    fn partial_document_overrides_fields() {
        let config =
            EngineConfig::from_json_str(r#"{ "load_distance": 2, "terrain": { "seed": 9 } }"#)
                .unwrap();
        assert_eq!(config.load_distance, 2);
        assert_eq!(config.terrain.seed, 9);
        assert_eq!(config.terrain.vertical_scale, 10.0);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "load_distance": 0 }"#),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "mesh_workers": 0 }"#),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str("not json"),
            Err(EngineError::ConfigParse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = EngineConfig::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, EngineError::ConfigIo { .. }));
    }
}
