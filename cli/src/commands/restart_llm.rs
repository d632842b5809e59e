//! `jobagent restart-llm`: stop, then start.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::container;

/// Run `jobagent restart-llm`.
///
/// # Errors
///
/// Returns any error from the stop or start phase. The container stays
/// down if the start phase fails.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let cfg = &app.config;
    let reporter = app.reporter("restarting...");
    let outcome = container::restart(&app.runtime, &app.fs, cfg, &reporter).await;
    reporter.finish();
    outcome?;

    if app.is_json() {
        super::print_status_json(app).await?;
    } else {
        app.output.success(&format!("{} restarted.", cfg.container_name));
    }
    Ok(ExitCode::SUCCESS)
}
