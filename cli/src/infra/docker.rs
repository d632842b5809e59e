//! Infrastructure implementation of the container port traits.
//!
//! `DockerRuntime<R>` routes every docker CLI call through a `CommandRunner`.

use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::application::ports::{
    CommandRunner, ContainerInspector, ContainerLifecycle, ForegroundCommand,
};
use crate::domain::container::LaunchSpec;
use crate::infra::command_runner::{LAUNCH_TIMEOUT, TokioCommandRunner};

const DOCKER: &str = "docker";

/// Docker CLI adapter.
///
/// Generic over `R: CommandRunner` so tests can inject a recording runner.
pub struct DockerRuntime<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> DockerRuntime<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl DockerRuntime<TokioCommandRunner> {
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner::default())
    }
}

impl<R: CommandRunner> ContainerLifecycle for DockerRuntime<R> {
    async fn run(&self, spec: &LaunchSpec) -> Result<Output> {
        let args = spec.run_args();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.runner
            .run_with_timeout(DOCKER, &args, LAUNCH_TIMEOUT)
            .await
    }

    async fn remove(&self, name: &str) -> Result<Output> {
        self.runner.run(DOCKER, &["rm", "-f", name]).await
    }

    async fn stop(&self, name: &str) -> Result<Output> {
        self.runner.run(DOCKER, &["stop", name]).await
    }
}

impl<R: CommandRunner> ContainerInspector for DockerRuntime<R> {
    async fn inspect(&self, name: &str) -> Result<Output> {
        self.runner
            .run(DOCKER, &["inspect", "--type", "container", name])
            .await
    }

    async fn follow_logs(&self, name: &str) -> Result<ExitStatus> {
        self.runner
            .run_foreground(&ForegroundCommand::new(DOCKER, &["logs", "-f", name]))
            .await
    }
}
