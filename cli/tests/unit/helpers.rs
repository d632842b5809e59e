//! Shared test helpers: fake ports and output constructors.

#![allow(dead_code, clippy::expect_used)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;
use jobagent_cli::application::ports::{
    CommandRunner, ContainerInspector, ContainerLifecycle, ForegroundCommand, HostFs,
    PackageManager, ProgressReporter,
};
use jobagent_cli::domain::config::{AppConfig, ConfigLayer};
use jobagent_cli::domain::container::LaunchSpec;
use jobagent_common::ContainerState;

// ── ExitStatus / Output construction ─────────────────────────────────────────

#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Config ───────────────────────────────────────────────────────────────────

/// Config whose engine and tokenizer dirs live under `root`, with a token.
pub fn config_under(root: &Path) -> AppConfig {
    let env = ConfigLayer {
        engine_dir: Some(root.join("engine").display().to_string()),
        tokenizer_dir: Some(root.join("tokenizer").display().to_string()),
        huggingface_token: Some("hf_test".to_string()),
        container_name: Some("llm_test".to_string()),
        ..ConfigLayer::default()
    };
    AppConfig::resolve(&env, &ConfigLayer::default(), &root.join(".env"), root)
        .expect("resolve")
}

// ── Fake docker ──────────────────────────────────────────────────────────────

/// Stateful docker stand-in. `run` makes the container running, `stop`
/// removes it (the server runs with `--rm`), `remove` deletes it.
pub struct FakeDocker {
    pub state: RefCell<ContainerState>,
    pub calls: RefCell<Vec<String>>,
    pub run_fails: bool,
    pub launched: RefCell<Option<LaunchSpec>>,
}

impl FakeDocker {
    pub fn new(state: ContainerState) -> Self {
        Self {
            state: RefCell::new(state),
            calls: RefCell::new(Vec::new()),
            run_fails: false,
            launched: RefCell::new(None),
        }
    }

    pub fn failing_run(state: ContainerState) -> Self {
        Self {
            run_fails: true,
            ..Self::new(state)
        }
    }

    /// Mutating calls only (`run`, `rm`, `stop`).
    pub fn mutations(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| *c != "inspect" && *c != "logs")
            .cloned()
            .collect()
    }

    fn record(&self, call: &str) {
        self.calls.borrow_mut().push(call.to_string());
    }
}

impl ContainerLifecycle for FakeDocker {
    async fn run(&self, spec: &LaunchSpec) -> Result<Output> {
        self.record("run");
        if self.run_fails {
            return Ok(err_output(125, b"docker: Error response from daemon: conflict"));
        }
        *self.launched.borrow_mut() = Some(spec.clone());
        *self.state.borrow_mut() = ContainerState::Running;
        Ok(ok_output(b"3f2a9c\n"))
    }

    async fn remove(&self, _: &str) -> Result<Output> {
        self.record("rm");
        *self.state.borrow_mut() = ContainerState::Absent;
        Ok(ok_output(b""))
    }

    async fn stop(&self, _: &str) -> Result<Output> {
        self.record("stop");
        *self.state.borrow_mut() = ContainerState::Absent;
        Ok(ok_output(b""))
    }
}

impl ContainerInspector for FakeDocker {
    async fn inspect(&self, name: &str) -> Result<Output> {
        self.record("inspect");
        Ok(match *self.state.borrow() {
            ContainerState::Absent => {
                err_output(1, format!("Error: No such container: {name}").as_bytes())
            }
            ContainerState::Stopped => {
                ok_output(br#"[{"State":{"Status":"exited","Running":false}}]"#)
            }
            ContainerState::Running => {
                ok_output(br#"[{"State":{"Status":"running","Running":true}}]"#)
            }
        })
    }

    async fn follow_logs(&self, _: &str) -> Result<ExitStatus> {
        self.record("logs");
        Ok(exit_status(0))
    }
}

// ── Fake filesystem ──────────────────────────────────────────────────────────

/// Filesystem where only the listed directories exist. Writes are refused.
pub struct DirsFs(pub Vec<PathBuf>);

impl HostFs for DirsFs {
    fn exists(&self, path: &Path) -> bool {
        self.is_dir(path)
    }
    fn is_dir(&self, path: &Path) -> bool {
        self.0.iter().any(|d| d == path)
    }
    fn create_dir_all(&self, _: &Path) -> Result<()> {
        anyhow::bail!("read-only test filesystem")
    }
    fn read_to_string(&self, path: &Path) -> Result<String> {
        anyhow::bail!("no such file: {}", path.display())
    }
    fn write(&self, _: &Path, _: &str) -> Result<()> {
        anyhow::bail!("read-only test filesystem")
    }
    fn set_permissions(&self, _: &Path, _: u32) -> Result<()> {
        anyhow::bail!("read-only test filesystem")
    }
}

// ── Fake runner / package manager ────────────────────────────────────────────

/// Runner for bootstrap checks. Programs listed in `missing` fail to spawn;
/// `python3 -m venv <dir>` creates `<dir>` for real.
pub struct HostRunner {
    pub missing: Vec<&'static str>,
    pub calls: RefCell<Vec<String>>,
}

impl HostRunner {
    pub fn with_missing(missing: &[&'static str]) -> Self {
        Self {
            missing: missing.to_vec(),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl CommandRunner for HostRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, Duration::from_secs(1))
            .await
    }

    async fn run_with_timeout(&self, program: &str, args: &[&str], _: Duration) -> Result<Output> {
        self.calls
            .borrow_mut()
            .push(format!("{program} {}", args.join(" ")));
        if self.missing.contains(&program) {
            anyhow::bail!("failed to spawn {program}");
        }
        if program == "python3"
            && let ["-m", "venv", dir] = args
        {
            std::fs::create_dir_all(Path::new(dir).join("bin"))?;
        }
        Ok(ok_output(format!("{program} version 1.0\n").as_bytes()))
    }

    async fn run_foreground(&self, _: &ForegroundCommand) -> Result<ExitStatus> {
        anyhow::bail!("foreground run not expected")
    }
}

/// Package manager with everything already installed.
pub struct AllInstalled;

impl PackageManager for AllInstalled {
    async fn is_installed(&self, _: &str) -> Result<bool> {
        Ok(true)
    }
    async fn refresh_index(&self) -> Result<Output> {
        anyhow::bail!("refresh not expected")
    }
    async fn install(&self, _: &str) -> Result<Output> {
        anyhow::bail!("install not expected")
    }
}

// ── Reporter ─────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingReporter {
    pub events: RefCell<Vec<(&'static str, String)>>,
}

impl RecordingReporter {
    pub fn count(&self, level: &str) -> usize {
        self.events.borrow().iter().filter(|(l, _)| *l == level).count()
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.events.borrow_mut().push(("step", message.to_string()));
    }
    fn success(&self, message: &str) {
        self.events.borrow_mut().push(("success", message.to_string()));
    }
    fn warn(&self, message: &str) {
        self.events.borrow_mut().push(("warn", message.to_string()));
    }
    fn error(&self, message: &str) {
        self.events.borrow_mut().push(("error", message.to_string()));
    }
}
