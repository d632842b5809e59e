//! `jobagent start-llm`: launch the inference server container.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::container::{self, StartOutcome};

/// Run `jobagent start-llm`.
///
/// # Errors
///
/// Returns an error if a precondition fails or docker cannot launch the
/// container.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let cfg = &app.config;
    let reporter = app.reporter("checking container...");
    let outcome = container::start(&app.runtime, &app.fs, cfg, &reporter).await;
    reporter.finish();

    match outcome? {
        StartOutcome::AlreadyRunning => {
            if !app.is_json() {
                app.output
                    .success(&format!("{} is already running.", cfg.container_name));
            }
        }
        StartOutcome::Started { .. } => {
            if !app.is_json() {
                app.output.info(&format!("API: {}", cfg.llm_api_url));
                app.output.info("Follow startup: jobagent status-llm");
                app.output.info("Wait until ready: jobagent check-llm --retries 30");
            }
        }
    }
    if app.is_json() {
        super::print_status_json(app).await?;
    }
    Ok(ExitCode::SUCCESS)
}
