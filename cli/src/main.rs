//! jobagent - lifecycle manager for the LLM server and the job agent

use std::process::ExitCode;

use clap::Parser;
use jobagent_cli::cli::Cli;
use jobagent_cli::commands::error_code;
use jobagent_cli::logging;
use jobagent_cli::output::json;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let json_mode = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            if json_mode && let Ok(out) = json::format_error(&format!("{e:#}"), error_code(&e)) {
                println!("{out}");
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
