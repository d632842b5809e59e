//! Infrastructure implementation of the `ConfigSource` port.
//!
//! The environment layer is decoded with `envy`; the file layer is parsed
//! with `dotenvy` and fed through the same `envy` decoder, so both layers
//! share one field mapping. Neither mutates the process environment.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::ConfigSource;
use crate::domain::config::ConfigLayer;

/// Reads configuration from the process environment and a `.env` file.
pub struct EnvConfigSource;

impl ConfigSource for EnvConfigSource {
    fn env_layer(&self) -> Result<ConfigLayer> {
        envy::from_env::<ConfigLayer>().context("cannot decode configuration from environment")
    }

    fn file_layer(&self, path: &Path) -> Result<ConfigLayer> {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no env file; using empty file layer");
            return Ok(ConfigLayer::default());
        }
        let pairs = dotenvy::from_path_iter(path)
            .with_context(|| format!("cannot read {}", path.display()))?
            .collect::<Result<Vec<(String, String)>, _>>()
            .with_context(|| format!("cannot parse {}", path.display()))?;
        envy::from_iter::<_, ConfigLayer>(pairs)
            .with_context(|| format!("cannot decode {}", path.display()))
    }
}
