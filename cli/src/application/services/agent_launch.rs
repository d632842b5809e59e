//! Foreground launch of the agent inside its virtual environment.

use std::ffi::OsString;
use std::process::ExitStatus;

use anyhow::Result;

use crate::application::ports::{CommandRunner, ForegroundCommand, HostFs};
use crate::domain::config::AppConfig;
use crate::domain::error::LifecycleError;
use crate::domain::layout::AGENT_ENTRY;

/// Build the command that runs `<base>/main.py` with the venv's interpreter.
///
/// The environment mirrors what activating the venv does (`VIRTUAL_ENV`,
/// `PATH` prefix, no `PYTHONHOME`) plus the effective configuration.
/// `current_path` is the caller's `PATH`, if any.
#[must_use]
pub fn agent_command(cfg: &AppConfig, current_path: Option<OsString>) -> ForegroundCommand {
    let venv = cfg.venv_dir();
    let bin = venv.join("bin");
    let python = bin.join("python");

    let mut path_entries = vec![bin];
    if let Some(path) = current_path {
        path_entries.extend(std::env::split_paths(&path));
    }
    let path = std::env::join_paths(path_entries).map_or_else(
        |_| venv.join("bin").display().to_string(),
        |p| p.to_string_lossy().into_owned(),
    );

    let mut env: Vec<(String, String)> = cfg
        .agent_env()
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    env.push(("VIRTUAL_ENV".to_string(), venv.display().to_string()));
    env.push(("PATH".to_string(), path));

    ForegroundCommand {
        program: python.display().to_string(),
        args: vec![AGENT_ENTRY.to_string()],
        env,
        env_remove: vec!["PYTHONHOME".to_string()],
        cwd: Some(cfg.base_dir.clone()),
    }
}

/// Run the agent in the foreground and return its exit status.
///
/// # Errors
///
/// Returns [`LifecycleError::MissingVenv`] if the virtual environment does
/// not exist, or an error if the interpreter cannot be spawned.
pub async fn run(
    runner: &impl CommandRunner,
    fs: &impl HostFs,
    cfg: &AppConfig,
) -> Result<ExitStatus> {
    let venv = cfg.venv_dir();
    if !fs.is_dir(&venv) {
        return Err(LifecycleError::MissingVenv {
            path: venv,
            base_dir: cfg.base_dir.clone(),
        }
        .into());
    }
    let entry = cfg.base_dir.join(AGENT_ENTRY);
    if !fs.exists(&entry) {
        tracing::debug!(path = %entry.display(), "agent entry point not found; python will report it");
    }
    let cmd = agent_command(cfg, std::env::var_os("PATH"));
    tracing::debug!(program = %cmd.program, cwd = ?cmd.cwd, "launching agent");
    runner.run_foreground(&cmd).await
}
