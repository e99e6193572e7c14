//! Errors surfaced while setting the engine up.
//!
//! Runtime voxel operations never fail loudly: structural rejections come back as
//! `bool` or `Option`. Only configuration and thread startup produce an [`EngineError`].

use std::{io, path::PathBuf};

/// Failure while configuring or starting the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to read config file {path:?}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config")]
    ConfigParse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to spawn worker thread `{name}`")]
    WorkerSpawn {
        name: String,
        #[source]
        source: io::Error,
    },
}
