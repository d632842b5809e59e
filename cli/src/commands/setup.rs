//! `jobagent-setup`: prepare a host for the agent.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;

use crate::application::ports::ConfigSource;
use crate::application::services::bootstrap::{self, BootstrapReport, PackageStatus, VenvStatus};
use crate::infra::apt::AptPackageManager;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::EnvConfigSource;
use crate::infra::fs::LocalFs;
use crate::output::OutputContext;
use crate::output::reporter::Reporter;

/// Run the bootstrapper against `base_dir`.
///
/// # Errors
///
/// Returns an error if docker is missing or the directory tree or `.env`
/// cannot be written.
pub async fn run(ctx: &OutputContext, base_dir: &Path) -> Result<ExitCode> {
    ctx.header(&format!("Setting up {}", base_dir.display()));
    let env = EnvConfigSource.env_layer()?;
    let runner = TokioCommandRunner::default();
    let packages = AptPackageManager::default_runner();

    let reporter = Reporter::for_context(ctx, false, "preparing...");
    let report = bootstrap::run(&runner, &packages, &LocalFs, &reporter, base_dir, &env).await;
    reporter.finish();
    let report = report?;

    print_next_steps(ctx, base_dir, &report);
    Ok(ExitCode::SUCCESS)
}

fn print_next_steps(ctx: &OutputContext, base_dir: &Path, report: &BootstrapReport) {
    let failed: Vec<&str> = report
        .packages
        .iter()
        .filter(|(_, s)| *s == PackageStatus::Failed)
        .map(|(name, _)| *name)
        .collect();

    if failed.is_empty() && report.venv != VenvStatus::Failed && report.gpu_runtime {
        ctx.success("Setup complete.");
    } else {
        ctx.warn("Setup finished with warnings; see above.");
    }
    if !failed.is_empty() {
        ctx.info(&format!("Install manually: sudo apt-get install -y {}", failed.join(" ")));
    }

    ctx.header("Next steps");
    let mut n = 1;
    if !report.env_file.token_set {
        ctx.info(&format!(
            "{n}. Set HUGGINGFACE_TOKEN in {}",
            base_dir.join(crate::domain::layout::ENV_FILE).display()
        ));
        n += 1;
    }
    if crate::app::default_base_dir().ok().as_deref() != Some(base_dir) {
        ctx.info(&format!(
            "{n}. Point jobagent at this directory: export PROJECT_BASE_DIR={}",
            base_dir.display()
        ));
        n += 1;
    }
    ctx.info(&format!("{n}. Start the LLM server: jobagent start-llm"));
    ctx.info(&format!("{}. Wait for it: jobagent check-llm --retries 30", n + 1));
    ctx.info(&format!("{}. Run the agent: jobagent start-agent", n + 2));
}
