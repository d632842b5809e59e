//! Inference-server container lifecycle: state, start, stop, logs, restart.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//!
//! There is no lock around these operations. Two concurrent `start` calls
//! can both observe an absent container; the runtime's unique-name check
//! rejects the second `docker run`, and that error is reported as is.

use anyhow::{Context, Result};
use jobagent_common::ContainerState;

use crate::application::ports::{ContainerInspector, ContainerRuntime, HostFs, ProgressReporter};
use crate::domain::config::AppConfig;
use crate::domain::container::LaunchSpec;
use crate::domain::error::LifecycleError;

/// Result of [`start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The container was already running; nothing was changed.
    AlreadyRunning,
    /// A new container was launched. `replaced_stopped` is `true` when a
    /// stopped container with the same name was removed first.
    Started { replaced_stopped: bool },
}

/// Result of [`stop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// No container with the configured name exists.
    NotFound,
    /// The stop signal was sent (or the container was already stopped).
    Stopped,
}

/// Result of [`follow_logs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogsOutcome {
    NotFound,
    /// The log stream ended (container exited or the user interrupted).
    Ended,
}

/// Get the current state of the named container.
///
/// A failing inspect (non-zero exit or spawn error) means the container is
/// absent.
///
/// # Errors
///
/// Returns an error if the inspect output cannot be parsed.
pub async fn state(rt: &impl ContainerInspector, name: &str) -> Result<ContainerState> {
    let output = match rt.inspect(name).await {
        Ok(o) if o.status.success() => o,
        _ => return Ok(ContainerState::Absent),
    };
    let info: serde_json::Value =
        serde_json::from_slice(&output.stdout).context("parsing docker inspect output")?;
    let Some(state) = info
        .as_array()
        .and_then(|a| a.first())
        .and_then(|c| c.get("State"))
    else {
        return Ok(ContainerState::Absent);
    };
    let running = state
        .get("Running")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or_else(|| state.get("Status").and_then(|s| s.as_str()) == Some("running"));
    Ok(if running {
        ContainerState::Running
    } else {
        ContainerState::Stopped
    })
}

/// Check everything `start` needs before it touches the runtime.
///
/// # Errors
///
/// Returns [`LifecycleError::MissingPath`] for a missing engine or tokenizer
/// directory, then [`LifecycleError::MissingToken`] for an empty token.
pub fn check_start_preconditions(cfg: &AppConfig, fs: &impl HostFs) -> Result<(), LifecycleError> {
    for (key, path) in cfg.required_dirs() {
        if !fs.is_dir(path) {
            return Err(LifecycleError::MissingPath {
                key,
                path: path.to_path_buf(),
                env_file: cfg.env_file.clone(),
            });
        }
    }
    if !cfg.has_token() {
        return Err(LifecycleError::MissingToken {
            env_file: cfg.env_file.clone(),
        });
    }
    Ok(())
}

/// Start the inference server.
///
/// Running → no-op. Stopped → remove, then launch. Absent → launch.
/// Removal failures are ignored; a container that really blocks the name
/// makes the launch fail with the runtime's own message.
///
/// # Errors
///
/// Returns an error if a precondition fails (before any runtime call) or
/// the container cannot be launched.
pub async fn start(
    rt: &impl ContainerRuntime,
    fs: &impl HostFs,
    cfg: &AppConfig,
    reporter: &impl ProgressReporter,
) -> Result<StartOutcome> {
    check_start_preconditions(cfg, fs)?;
    let name = cfg.container_name.as_str();

    let mut replaced_stopped = false;
    match state(rt, name).await? {
        ContainerState::Running => return Ok(StartOutcome::AlreadyRunning),
        ContainerState::Stopped => {
            reporter.step(&format!("removing stopped container {name}..."));
            if let Err(e) = rt.remove(name).await {
                tracing::debug!(error = %e, "docker rm failed; continuing");
            }
            replaced_stopped = true;
        }
        ContainerState::Absent => {}
    }

    let spec = LaunchSpec::from_config(cfg);
    reporter.step(&format!("launching {name} ({})...", spec.image));
    let output = rt.run(&spec).await.context("launching inference server")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("failed to start {name}: {}", stderr.trim());
    }
    reporter.success(&format!("{name} started on port {}", cfg.port));
    Ok(StartOutcome::Started { replaced_stopped })
}

/// Stop the inference server. Stop failures are reported as warnings.
///
/// # Errors
///
/// Returns an error only if the container state cannot be determined.
pub async fn stop(
    rt: &impl ContainerRuntime,
    name: &str,
    reporter: &impl ProgressReporter,
) -> Result<StopOutcome> {
    if !state(rt, name).await?.exists() {
        return Ok(StopOutcome::NotFound);
    }
    reporter.step(&format!("stopping {name}..."));
    match rt.stop(name).await {
        Ok(o) if o.status.success() => {}
        Ok(o) => {
            let stderr = String::from_utf8_lossy(&o.stderr);
            reporter.warn(&format!("docker stop {name} failed: {}", stderr.trim()));
        }
        Err(e) => reporter.warn(&format!("docker stop {name} failed: {e}")),
    }
    Ok(StopOutcome::Stopped)
}

/// Stream the container's logs until it exits or the user interrupts.
///
/// # Errors
///
/// Returns an error if the state cannot be determined or the log follower
/// cannot be spawned.
pub async fn follow_logs(rt: &impl ContainerInspector, name: &str) -> Result<LogsOutcome> {
    if !state(rt, name).await?.exists() {
        return Ok(LogsOutcome::NotFound);
    }
    let status = rt.follow_logs(name).await?;
    tracing::debug!(?status, "log stream ended");
    Ok(LogsOutcome::Ended)
}

/// Stop, then start. Not atomic: if `start` fails the container stays down.
///
/// # Errors
///
/// Returns any error from [`stop`] or [`start`].
pub async fn restart(
    rt: &impl ContainerRuntime,
    fs: &impl HostFs,
    cfg: &AppConfig,
    reporter: &impl ProgressReporter,
) -> Result<StartOutcome> {
    stop(rt, &cfg.container_name, reporter).await?;
    start(rt, fs, cfg, reporter).await
}
