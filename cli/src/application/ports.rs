//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;

use crate::domain::{ConfigLayer, LaunchSpec};

// ── Value Types ───────────────────────────────────────────────────────────────

/// A process run in the foreground with inherited stdio.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForegroundCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Variables set (or overridden) in the child's environment.
    pub env: Vec<(String, String)>,
    /// Variables removed from the child's environment.
    pub env_remove: Vec<String>,
    /// Working directory; inherits the caller's when `None`.
    pub cwd: Option<PathBuf>,
}

impl ForegroundCommand {
    #[must_use]
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
            ..Self::default()
        }
    }
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program in the foreground with inherited stdio and no timeout,
    /// returning its exit status.
    ///
    /// An interrupt reaches the child through the shared process group; the
    /// caller keeps waiting until the child has exited.
    async fn run_foreground(&self, cmd: &ForegroundCommand) -> Result<ExitStatus>;
}

// ── Container Port Traits ─────────────────────────────────────────────────────

/// Container lifecycle operations: create, remove, stop.
#[allow(async_fn_in_trait)]
pub trait ContainerLifecycle {
    /// Create and start a detached container from `spec`.
    async fn run(&self, spec: &LaunchSpec) -> Result<Output>;
    /// Forcibly remove the named container.
    async fn remove(&self, name: &str) -> Result<Output>;
    /// Send the stop signal to the named container.
    async fn stop(&self, name: &str) -> Result<Output>;
}

/// Container state inspection and log streaming.
#[allow(async_fn_in_trait)]
pub trait ContainerInspector {
    /// Inspect the named container as JSON. A non-zero exit means the
    /// container does not exist.
    async fn inspect(&self, name: &str) -> Result<Output>;
    /// Stream the container's logs to the terminal until interrupted.
    async fn follow_logs(&self, name: &str) -> Result<ExitStatus>;
}

/// Composite trait: any type implementing both sub-traits is a `ContainerRuntime`.
pub trait ContainerRuntime: ContainerLifecycle + ContainerInspector {}

/// Blanket implementation: any type implementing both sub-traits is a `ContainerRuntime`.
impl<T> ContainerRuntime for T where T: ContainerLifecycle + ContainerInspector {}

// ── Package Manager Port ──────────────────────────────────────────────────────

/// System package operations used by the bootstrapper.
#[allow(async_fn_in_trait)]
pub trait PackageManager {
    /// Returns `Ok(true)` if `package` is installed.
    async fn is_installed(&self, package: &str) -> Result<bool>;
    /// Refresh the package index.
    async fn refresh_index(&self) -> Result<Output>;
    /// Install `package` non-interactively.
    async fn install(&self, package: &str) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait; no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit an error message for a failure the run continues past.
    fn error(&self, message: &str);
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Sources for the two configuration layers.
pub trait ConfigSource {
    /// Values set in the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be decoded.
    fn env_layer(&self) -> Result<ConfigLayer>;

    /// Values assigned in the `.env` file at `path`. A missing file yields
    /// an empty layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn file_layer(&self, path: &Path) -> Result<ConfigLayer>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts local filesystem access.
pub trait HostFs {
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    /// Create `path` and its parents; succeeds if it already exists.
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, content: &str) -> Result<()>;
    /// Set unix permission bits; a no-op elsewhere.
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()>;
}

// ── Network Probe Port ────────────────────────────────────────────────────────

/// Abstracts the OpenAI-compatible endpoint check so services can be tested
/// without real network access.
#[allow(async_fn_in_trait)]
pub trait LlmProbe {
    /// Send a minimal chat-completion request to `url`.
    ///
    /// Returns `Ok(true)` on HTTP 200, `Ok(false)` when the server is
    /// unreachable or answers with any other status.
    async fn ping(&self, url: &str, timeout: Duration) -> Result<bool>;
}
