//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

use crate::app::{AppContext, OutputFlags};
use crate::commands;

/// Manage the local TensorRT-LLM server and run the job agent
#[derive(Parser)]
#[command(name = "jobagent", version, propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Log diagnostics (external commands, config sources) to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Read configuration from this file instead of <base>/.env
    #[arg(long, global = true, env = "JOBAGENT_ENV_FILE", value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the LLM server container
    StartLlm,

    /// Stop the LLM server container
    StopLlm,

    /// Follow the LLM server logs (with --json: print its state)
    StatusLlm,

    /// Stop, then start the LLM server container
    RestartLlm,

    /// Run the agent in the foreground inside its virtual environment
    StartAgent,

    /// Check whether the LLM API answers
    CheckLlm(commands::check_llm::CheckLlmArgs),

    /// Show the effective configuration
    Config,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Some(command) = self.command else {
            Self::command().print_help()?;
            println!();
            return Ok(ExitCode::SUCCESS);
        };
        let flags = OutputFlags {
            no_color: self.no_color,
            quiet: self.quiet,
            json: self.json,
        };
        let app = AppContext::new(&flags, self.env_file.as_deref())?;
        tracing::debug!(?command, config = ?Redacted(&app.config), "dispatching");

        match command {
            Command::StartLlm => commands::start_llm::run(&app).await,
            Command::StopLlm => commands::stop_llm::run(&app).await,
            Command::StatusLlm => commands::status_llm::run(&app).await,
            Command::RestartLlm => commands::restart_llm::run(&app).await,
            Command::StartAgent => commands::start_agent::run(&app).await,
            Command::CheckLlm(args) => commands::check_llm::run(&app, &args).await,
            Command::Config => commands::config::run(&app),
        }
    }
}

/// Debug view of the configuration with the token masked.
struct Redacted<'a>(&'a crate::domain::config::AppConfig);

impl std::fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cfg = self.0;
        f.debug_struct("AppConfig")
            .field("base_dir", &cfg.base_dir)
            .field("env_file", &cfg.env_file)
            .field("engine_dir", &cfg.engine_dir)
            .field("tokenizer_dir", &cfg.tokenizer_dir)
            .field("image", &cfg.image)
            .field("container_name", &cfg.container_name)
            .field("port", &cfg.port)
            .field("force_build", &cfg.force_build)
            .field("huggingface_token", &if cfg.has_token() { "***" } else { "" })
            .field("cache_dir", &cfg.cache_dir)
            .field("llm_api_url", &cfg.llm_api_url)
            .finish()
    }
}
