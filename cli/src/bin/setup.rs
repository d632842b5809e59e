//! jobagent-setup - one-time host preparation

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use jobagent_cli::app::default_base_dir;
use jobagent_cli::commands::setup;
use jobagent_cli::logging;
use jobagent_cli::output::OutputContext;

/// Prepare the directory tree, system packages, virtual environment and
/// .env file for the job agent. Safe to re-run.
#[derive(Parser)]
#[command(name = "jobagent-setup", version)]
struct SetupCli {
    /// Base directory [default: ~/ai-job-agent]
    #[arg(value_name = "BASE_DIR")]
    base_dir: Option<PathBuf>,

    /// Suppress non-error output
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    no_color: bool,

    /// Log diagnostics to stderr
    #[arg(short, long)]
    verbose: bool,
}

async fn run(cli: SetupCli) -> Result<ExitCode> {
    let base = match cli.base_dir {
        Some(dir) => dir,
        None => default_base_dir()?,
    };
    let base = std::path::absolute(&base)
        .with_context(|| format!("cannot resolve {}", base.display()))?;
    let ctx = OutputContext::new(cli.no_color, cli.quiet);
    setup::run(&ctx, &base).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = SetupCli::parse();
    logging::init(cli.verbose);
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
