//! Debian package manager adapter: `dpkg -s` to check, `apt-get` to install.

use std::cell::OnceCell;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{CommandRunner, PackageManager};
use crate::infra::command_runner::TokioCommandRunner;

const UPDATE_TIMEOUT: Duration = Duration::from_secs(600);
const INSTALL_TIMEOUT: Duration = Duration::from_secs(1800);

/// `PackageManager` backed by apt. Installs go through `sudo` unless the
/// current user is root.
pub struct AptPackageManager<R: CommandRunner> {
    runner: R,
    is_root: OnceCell<bool>,
}

impl<R: CommandRunner> AptPackageManager<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            is_root: OnceCell::new(),
        }
    }

    async fn running_as_root(&self) -> bool {
        if let Some(root) = self.is_root.get() {
            return *root;
        }
        let root = match self.runner.run("id", &["-u"]).await {
            Ok(o) if o.status.success() => String::from_utf8_lossy(&o.stdout).trim() == "0",
            _ => false,
        };
        tracing::debug!(root, "detected privilege level");
        *self.is_root.get_or_init(|| root)
    }

    async fn privileged(&self, args: &[&str], timeout: Duration) -> Result<Output> {
        if self.running_as_root().await {
            self.runner.run_with_timeout("apt-get", args, timeout).await
        } else {
            let mut full = vec!["apt-get"];
            full.extend_from_slice(args);
            self.runner.run_with_timeout("sudo", &full, timeout).await
        }
    }
}

impl AptPackageManager<TokioCommandRunner> {
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner::default())
    }
}

impl<R: CommandRunner> PackageManager for AptPackageManager<R> {
    async fn is_installed(&self, package: &str) -> Result<bool> {
        let output = self.runner.run("dpkg", &["-s", package]).await?;
        Ok(output.status.success())
    }

    async fn refresh_index(&self) -> Result<Output> {
        self.privileged(&["update"], UPDATE_TIMEOUT).await
    }

    async fn install(&self, package: &str) -> Result<Output> {
        self.privileged(&["install", "-y", package], INSTALL_TIMEOUT)
            .await
    }
}
