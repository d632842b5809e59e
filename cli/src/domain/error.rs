//! Typed domain error enums.
//!
//! Each variant is a fatal precondition: the message names what is missing
//! and the one thing the operator should do about it. All error types
//! implement `thiserror::Error` and convert to `anyhow::Error` via `?`.

use std::path::PathBuf;

use thiserror::Error;

// ── Lifecycle errors ──────────────────────────────────────────────────────────

/// Preconditions checked by the lifecycle manager before touching the
/// container runtime or launching the agent.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(
        "{key} does not exist: {}\n\nSet {key} in {} to an existing directory.",
        .path.display(),
        .env_file.display()
    )]
    MissingPath {
        key: &'static str,
        path: PathBuf,
        env_file: PathBuf,
    },

    #[error(
        "HUGGINGFACE_TOKEN is empty.\n\nAdd HUGGINGFACE_TOKEN=hf_... to {} or export it.",
        .env_file.display()
    )]
    MissingToken { env_file: PathBuf },

    #[error(
        "Virtual environment not found: {}\n\nRun 'jobagent-setup {}' first.",
        .path.display(),
        .base_dir.display()
    )]
    MissingVenv { path: PathBuf, base_dir: PathBuf },

    #[error("Invalid OPENAI_PORT '{value}': expected a port number between 1 and 65535.")]
    InvalidPort { value: String },
}

// ── Bootstrap errors ──────────────────────────────────────────────────────────

/// Fatal conditions for the bootstrapper.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(
        "Docker is not installed.\n\n\
         Install it from https://docs.docker.com/engine/install/ and re-run jobagent-setup."
    )]
    MissingContainerRuntime,

    #[error("Cannot determine the home directory. Pass the base directory explicitly.")]
    NoHomeDirectory,
}
