//! `jobagent start-agent`: run the agent in the foreground.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::agent_launch;

/// Run `jobagent start-agent` and exit with the agent's own status.
///
/// # Errors
///
/// Returns an error if the virtual environment is missing or the
/// interpreter cannot be spawned.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    if !app.is_json() {
        app.output.info(&format!(
            "Starting agent in {} (LLM API: {})",
            app.config.base_dir.display(),
            app.config.llm_api_url
        ));
    }
    let status = agent_launch::run(&app.runner, &app.fs, &app.config).await?;
    if !status.success() {
        tracing::debug!(?status, "agent exited with failure");
    }
    Ok(super::exit_code(status))
}
