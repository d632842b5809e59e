//! Application service: configuration use-cases.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::application::ports::ConfigSource;
use crate::domain::config::{AppConfig, ConfigLayer};
use crate::domain::layout::ENV_FILE;

/// Locate the `.env` file: an explicit path wins, then
/// `$PROJECT_BASE_DIR/.env`, then `<default_base>/.env`.
#[must_use]
pub fn env_file_path(env: &ConfigLayer, explicit: Option<&Path>, default_base: &Path) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match env.project_base_dir.as_deref() {
        Some(base) if !base.is_empty() => Path::new(base).join(ENV_FILE),
        _ => default_base.join(ENV_FILE),
    }
}

/// Build the effective configuration for this invocation.
///
/// Reads both layers exactly once; callers pass the returned value by
/// reference from here on.
///
/// # Errors
///
/// Returns an error if a layer cannot be read or a value is invalid.
pub fn load_config(
    source: &impl ConfigSource,
    explicit_env_file: Option<&Path>,
    default_base: &Path,
) -> Result<AppConfig> {
    let env = source.env_layer()?;
    let env_file = env_file_path(&env, explicit_env_file, default_base);
    let file = source.file_layer(&env_file)?;
    let fallback_base = env_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(default_base);
    tracing::debug!(env_file = %env_file.display(), "configuration layers loaded");
    Ok(AppConfig::resolve(&env, &file, &env_file, fallback_base)?)
}
