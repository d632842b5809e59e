//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` runs processes with tokio, kills them on timeout, and
//! logs every invocation at debug level with secrets masked.

use std::process::{ExitStatus, Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use jobagent_common::keys::names;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::application::ports::{CommandRunner, ForegroundCommand};

/// Default timeout for short queries (`docker inspect`, `dpkg -s`, `--version`).
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for `docker run`, which may pull the image first.
pub const LAUNCH_TIMEOUT: Duration = Duration::from_secs(1800);

/// Production `CommandRunner`.
///
/// `tokio::time::timeout` around `.output().await` drops the future without
/// killing the child on every platform, so the timeout arm of the `select!`
/// kills it explicitly.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

/// Mask the value of any `KEY=value` argument whose key holds a secret.
#[must_use]
pub fn redact_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| redact(a)).collect()
}

fn redact(arg: &str) -> String {
    match arg.split_once('=') {
        Some((key, value)) if key == names::HUGGINGFACE_TOKEN && !value.is_empty() => {
            format!("{key}=***")
        }
        _ => arg.to_string(),
    }
}

async fn drain(handle: Option<impl AsyncRead + Unpin>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = h.read_to_end(&mut buf).await;
    }
    buf
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        tracing::debug!(program, args = ?redact_args(args), "running");
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let output = tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(child.wait(), drain(stdout), drain(stderr));
                Ok::<Output, anyhow::Error>(Output {
                    status: status.with_context(|| format!("waiting for {program}"))?,
                    stdout,
                    stderr,
                })
            } => result?,
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                anyhow::bail!("{program} timed out after {}s", timeout.as_secs())
            }
        };
        tracing::debug!(program, status = ?output.status, "finished");
        Ok(output)
    }

    async fn run_foreground(&self, cmd: &ForegroundCommand) -> Result<ExitStatus> {
        let mut command = tokio::process::Command::new(&cmd.program);
        command.args(&cmd.args);
        for (key, value) in &cmd.env {
            command.env(key, value);
        }
        for key in &cmd.env_remove {
            command.env_remove(key);
        }
        if let Some(dir) = &cmd.cwd {
            command.current_dir(dir);
        }
        tracing::debug!(program = %cmd.program, args = ?cmd.args, "running in foreground");
        let mut child = command
            .spawn()
            .with_context(|| format!("failed to spawn {}", cmd.program))?;

        // The terminal delivers SIGINT to the whole process group, so the
        // child sees it too; keep waiting so its exit status is reported.
        loop {
            tokio::select! {
                status = child.wait() => {
                    return status.with_context(|| format!("waiting for {}", cmd.program));
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::debug!(program = %cmd.program, "interrupt received; waiting for child");
                }
            }
        }
    }
}
