//! Application context: unified state passed to every command handler.
//!
//! Built once per invocation: the configuration is resolved here and never
//! re-read from the environment afterwards.

use std::path::{Path, PathBuf};

use anyhow::Result;
use jobagent_common::keys::defaults;

use crate::application::services::config_service;
use crate::domain::config::AppConfig;
use crate::domain::error::BootstrapError;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::EnvConfigSource;
use crate::infra::docker::DockerRuntime;
use crate::infra::fs::LocalFs;
use crate::infra::network::UreqLlmProbe;
use crate::output::OutputContext;
use crate::output::reporter::Reporter;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Output flags passed from the top-level CLI.
pub struct OutputFlags {
    pub no_color: bool,
    pub quiet: bool,
    pub json: bool,
}

/// `~/ai-job-agent`.
///
/// # Errors
///
/// Returns [`BootstrapError::NoHomeDirectory`] if the home directory is unknown.
pub fn default_base_dir() -> Result<PathBuf, BootstrapError> {
    dirs::home_dir()
        .map(|h| h.join(defaults::BASE_DIR_NAME))
        .ok_or(BootstrapError::NoHomeDirectory)
}

/// Unified application context for the lifecycle manager.
pub struct AppContext {
    pub output: OutputContext,
    pub mode: OutputMode,
    pub config: AppConfig,
    pub runtime: DockerRuntime<TokioCommandRunner>,
    pub runner: TokioCommandRunner,
    pub fs: LocalFs,
    pub probe: UreqLlmProbe,
}

impl AppContext {
    /// Resolve configuration and wire the production adapters.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or is invalid.
    pub fn new(flags: &OutputFlags, env_file: Option<&Path>) -> Result<Self> {
        let default_base = default_base_dir()?;
        let config = config_service::load_config(&EnvConfigSource, env_file, &default_base)?;
        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            mode: if flags.json {
                OutputMode::Json
            } else {
                OutputMode::Human
            },
            config,
            runtime: DockerRuntime::default_runner(),
            runner: TokioCommandRunner::default(),
            fs: LocalFs,
            probe: UreqLlmProbe,
        })
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Progress reporter for the current output mode.
    #[must_use]
    pub fn reporter(&self, initial: &str) -> Reporter<'_> {
        Reporter::for_context(&self.output, self.is_json(), initial)
    }
}
