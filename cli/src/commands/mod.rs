//! Command implementations

pub mod check_llm;
pub mod config;
pub mod restart_llm;
pub mod setup;
pub mod start_agent;
pub mod start_llm;
pub mod status_llm;
pub mod stop_llm;

use std::process::{ExitCode, ExitStatus};

use anyhow::Result;
use jobagent_common::StatusOutput;

use crate::app::AppContext;
use crate::application::services::container;
use crate::domain::error::{BootstrapError, LifecycleError};

/// Map a child's exit status to our own exit code.
#[must_use]
pub fn exit_code(status: ExitStatus) -> ExitCode {
    ExitCode::from(exit_code_value(status))
}

/// A signal-terminated child maps to `128 + signal`, like a shell does.
fn exit_code_value(status: ExitStatus) -> u8 {
    if let Some(code) = status.code() {
        return u8::try_from(code).unwrap_or(1);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return u8::try_from(128 + signal).unwrap_or(1);
        }
    }
    1
}

/// Stable code for the `--json` error object.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if let Some(e) = err.downcast_ref::<LifecycleError>() {
        return match e {
            LifecycleError::MissingPath { .. } => "MISSING_PATH",
            LifecycleError::MissingToken { .. } => "MISSING_TOKEN",
            LifecycleError::MissingVenv { .. } => "MISSING_VENV",
            LifecycleError::InvalidPort { .. } => "INVALID_PORT",
        };
    }
    if let Some(e) = err.downcast_ref::<BootstrapError>() {
        return match e {
            BootstrapError::MissingContainerRuntime => "MISSING_DOCKER",
            BootstrapError::NoHomeDirectory => "NO_HOME",
        };
    }
    "ERROR"
}

/// Print the container's current state as JSON.
pub(crate) async fn print_status_json(app: &AppContext) -> Result<()> {
    let name = &app.config.container_name;
    let state = container::state(&app.runtime, name).await?;
    crate::output::json::print(&StatusOutput {
        container: name.clone(),
        state,
    })
}
