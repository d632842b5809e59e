//! `jobagent check-llm`: probe the OpenAI-compatible endpoint.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::application::services::llm_check::{self, LlmStatus};
use crate::output::progress;
use crate::output::reporter::Reporter;

/// Arguments for the check-llm command.
#[derive(Args, Debug, Clone)]
pub struct CheckLlmArgs {
    /// Extra attempts after the first one fails
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Seconds to wait between attempts
    #[arg(long, default_value_t = 10, value_name = "SECS")]
    pub interval: u64,
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    url: &'a str,
    online: bool,
    attempts: u32,
}

/// Run `jobagent check-llm`. Exits 0 when the server answered, 1 otherwise.
///
/// # Errors
///
/// Returns an error only if the JSON result cannot be printed.
pub async fn run(app: &AppContext, args: &CheckLlmArgs) -> Result<ExitCode> {
    let url = app.config.llm_api_url.as_str();
    let reporter = app.reporter(&format!("checking {url}..."));
    let status = llm_check::wait_for_llm(
        &app.probe,
        url,
        args.retries,
        Duration::from_secs(args.interval),
        &reporter,
    )
    .await?;

    let (online, attempts) = match status {
        LlmStatus::Online { attempt } => (true, attempt),
        LlmStatus::Offline { attempts } => (false, attempts),
    };

    if let Reporter::Spinner(s) = &reporter {
        if online {
            progress::finish_ok(s.bar(), &format!("LLM server online at {url}"));
        } else {
            progress::finish_error(s.bar(), &format!("LLM server offline at {url}"));
        }
    } else if app.is_json() {
        crate::output::json::print(&CheckOutput {
            url,
            online,
            attempts,
        })?;
    } else if online {
        app.output.success(&format!("LLM server online at {url}"));
    } else {
        app.output.error(&format!(
            "LLM server offline at {url} after {attempts} attempt(s)"
        ));
    }

    Ok(if status.is_online() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
