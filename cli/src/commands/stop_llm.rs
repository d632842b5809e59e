//! `jobagent stop-llm`: stop the inference server container.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::container::{self, StopOutcome};

/// Run `jobagent stop-llm`.
///
/// # Errors
///
/// Returns an error if the container state cannot be determined.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let name = &app.config.container_name;
    let reporter = app.reporter("checking container...");
    let outcome = container::stop(&app.runtime, name, &reporter).await;
    reporter.finish();

    if app.is_json() {
        outcome?;
        super::print_status_json(app).await?;
        return Ok(ExitCode::SUCCESS);
    }
    match outcome? {
        StopOutcome::NotFound => app.output.info(&format!("{name} is not running.")),
        StopOutcome::Stopped => app.output.success(&format!("{name} stopped.")),
    }
    Ok(ExitCode::SUCCESS)
}
