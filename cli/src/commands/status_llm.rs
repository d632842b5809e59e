//! `jobagent status-llm`: follow the server's logs, or print its state.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::container::{self, LogsOutcome};

/// Run `jobagent status-llm`.
///
/// In `--json` mode prints the state and returns; otherwise streams the
/// container's logs until it exits or the user presses Ctrl+C.
///
/// # Errors
///
/// Returns an error if the state cannot be read or `docker logs` cannot be
/// spawned.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    if app.is_json() {
        super::print_status_json(app).await?;
        return Ok(ExitCode::SUCCESS);
    }
    let name = &app.config.container_name;
    let state = container::state(&app.runtime, name).await?;
    if state.exists() {
        app.output.info(&format!(
            "{name} is {state}. Following logs (Ctrl+C to stop)..."
        ));
    }
    match container::follow_logs(&app.runtime, name).await? {
        LogsOutcome::NotFound => {
            app.output.info(&format!("{name} is not running."));
            app.output.info("Start it: jobagent start-llm");
        }
        LogsOutcome::Ended => {}
    }
    Ok(ExitCode::SUCCESS)
}
