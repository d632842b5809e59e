//! One-time host preparation: directory tree, system packages, container
//! runtime checks, virtual environment, `.env`, and `.gitignore`.
//!
//! Every step is idempotent. Only a missing container runtime stops the run;
//! package, GPU-runtime and venv problems are reported and skipped.

use std::cell::Cell;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use jobagent_common::keys::{SEEDED_KEYS, names, seeded_default};
use jobagent_common::{Edit, EnvDocument};

use crate::application::ports::{CommandRunner, HostFs, PackageManager, ProgressReporter};
use crate::domain::config::ConfigLayer;
use crate::domain::error::BootstrapError;
use crate::domain::layout::{
    ENV_FILE, GITIGNORE, GITIGNORE_FILE, NOTES_BODY, NOTES_MARKER, REQUIRED_PACKAGES,
    RequiredPackage, VENV_DIR, subdir_paths,
};

const VENV_TIMEOUT: Duration = Duration::from_secs(300);
const DOCKER_INSTALL_URL: &str = "https://docs.docker.com/engine/install/";
const NVIDIA_TOOLKIT_URL: &str =
    "https://docs.nvidia.com/datacenter/cloud-native/container-toolkit/latest/install-guide.html";

/// Outcome of a single package check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageStatus {
    AlreadyInstalled,
    Installed,
    Failed,
}

/// Outcome of the venv step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenvStatus {
    Existing,
    Created,
    Failed,
}

/// What the `.env` step changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFileReport {
    pub inserted: Vec<String>,
    pub updated: Vec<String>,
    pub notes_added: bool,
    /// `true` if the file was (re)written.
    pub written: bool,
    /// `true` if `HUGGINGFACE_TOKEN` holds a non-empty value after the run.
    pub token_set: bool,
}

/// Summary of a bootstrap run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub packages: Vec<(&'static str, PackageStatus)>,
    pub docker_version: String,
    pub gpu_runtime: bool,
    pub venv: VenvStatus,
    pub env_file: EnvFileReport,
    pub gitignore_created: bool,
}

/// Run every bootstrap step against `base_dir`.
///
/// `env` seeds the `.env` values: a key set in the environment is written
/// as is, otherwise its built-in default.
///
/// # Errors
///
/// Returns [`BootstrapError::MissingContainerRuntime`] if docker is not
/// installed, or an I/O error if the directory tree or `.env` cannot be
/// written.
pub async fn run(
    runner: &impl CommandRunner,
    packages: &impl PackageManager,
    fs: &impl HostFs,
    reporter: &impl ProgressReporter,
    base_dir: &Path,
    env: &ConfigLayer,
) -> Result<BootstrapReport> {
    ensure_directories(fs, base_dir, reporter)?;
    let packages = ensure_packages(packages, REQUIRED_PACKAGES, reporter).await;
    let docker_version = check_container_runtime(runner).await?;
    reporter.success(&format!("docker found ({docker_version})"));
    let gpu_runtime = check_gpu_runtime(runner, reporter).await;
    let venv = ensure_venv(runner, fs, base_dir, reporter).await;
    let env_file = write_env_file(fs, base_dir, env, reporter)?;
    let gitignore_created = ensure_gitignore(fs, base_dir, reporter)?;

    Ok(BootstrapReport {
        packages,
        docker_version,
        gpu_runtime,
        venv,
        env_file,
        gitignore_created,
    })
}

/// Create the base directory and its fixed subdirectories.
///
/// # Errors
///
/// Returns an error if a directory cannot be created.
pub fn ensure_directories(
    fs: &impl HostFs,
    base_dir: &Path,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    reporter.step(&format!("preparing {}...", base_dir.display()));
    fs.create_dir_all(base_dir)?;
    for dir in subdir_paths(base_dir) {
        fs.create_dir_all(&dir)?;
    }
    reporter.success("directory tree ready");
    Ok(())
}

/// Runs the package-index refresh at most once.
struct IndexRefresh<'a, P> {
    packages: &'a P,
    done: Cell<bool>,
}

impl<P: PackageManager> IndexRefresh<'_, P> {
    async fn ensure(&self, reporter: &impl ProgressReporter) {
        if self.done.replace(true) {
            return;
        }
        reporter.step("refreshing package index...");
        match self.packages.refresh_index().await {
            Ok(o) if o.status.success() => {}
            Ok(o) => reporter.warn(&format!(
                "package index refresh failed: {}",
                String::from_utf8_lossy(&o.stderr).trim()
            )),
            Err(e) => reporter.warn(&format!("package index refresh failed: {e}")),
        }
    }
}

/// Check each package and install the missing ones. Failures are reported,
/// never returned.
pub async fn ensure_packages(
    packages: &impl PackageManager,
    wanted: &[RequiredPackage],
    reporter: &impl ProgressReporter,
) -> Vec<(&'static str, PackageStatus)> {
    let refresh = IndexRefresh {
        packages,
        done: Cell::new(false),
    };
    let mut results = Vec::with_capacity(wanted.len());
    for pkg in wanted {
        if let Ok(true) = packages.is_installed(pkg.name).await {
            reporter.success(&format!("{} already installed", pkg.name));
            results.push((pkg.name, PackageStatus::AlreadyInstalled));
            continue;
        }
        refresh.ensure(reporter).await;
        reporter.step(&format!("installing {} ({})...", pkg.name, pkg.purpose));
        let failure = match packages.install(pkg.name).await {
            Ok(o) if o.status.success() => None,
            Ok(o) => Some(String::from_utf8_lossy(&o.stderr).trim().to_string()),
            Err(e) => Some(e.to_string()),
        };
        let status = match failure {
            None => {
                reporter.success(&format!("{} installed", pkg.name));
                PackageStatus::Installed
            }
            Some(reason) if pkg.critical => {
                reporter.error(&format!("could not install {}: {reason}", pkg.name));
                PackageStatus::Failed
            }
            Some(reason) => {
                reporter.warn(&format!(
                    "could not install {} ({} unavailable): {reason}",
                    pkg.name, pkg.purpose
                ));
                PackageStatus::Failed
            }
        };
        results.push((pkg.name, status));
    }
    results
}

/// Verify docker is installed and return its version line.
///
/// # Errors
///
/// Returns [`BootstrapError::MissingContainerRuntime`] if `docker --version`
/// cannot be run or fails.
pub async fn check_container_runtime(runner: &impl CommandRunner) -> Result<String> {
    match runner.run("docker", &["--version"]).await {
        Ok(o) if o.status.success() => Ok(String::from_utf8_lossy(&o.stdout).trim().to_string()),
        Ok(_) | Err(_) => {
            tracing::debug!(url = DOCKER_INSTALL_URL, "docker not found");
            Err(BootstrapError::MissingContainerRuntime.into())
        }
    }
}

/// Look for the NVIDIA container runtime. Absence is a warning: it is only
/// needed when the server starts.
pub async fn check_gpu_runtime(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
) -> bool {
    for program in ["nvidia-container-runtime", "nvidia-ctk"] {
        if let Ok(o) = runner.run(program, &["--version"]).await
            && o.status.success()
        {
            reporter.success(&format!("{program} found"));
            return true;
        }
    }
    reporter.warn(&format!(
        "NVIDIA container runtime not found; start-llm will fail until it is installed: {NVIDIA_TOOLKIT_URL}"
    ));
    false
}

/// Create `<base>/venv` unless the directory already exists.
pub async fn ensure_venv(
    runner: &impl CommandRunner,
    fs: &impl HostFs,
    base_dir: &Path,
    reporter: &impl ProgressReporter,
) -> VenvStatus {
    let venv = base_dir.join(VENV_DIR);
    if fs.is_dir(&venv) {
        reporter.success(&format!("virtual environment exists at {}", venv.display()));
        return VenvStatus::Existing;
    }
    reporter.step(&format!("creating virtual environment at {}...", venv.display()));
    let venv_str = venv.to_string_lossy().into_owned();
    match runner
        .run_with_timeout("python3", &["-m", "venv", venv_str.as_str()], VENV_TIMEOUT)
        .await
    {
        Ok(o) if o.status.success() => {
            reporter.success("virtual environment created");
            VenvStatus::Created
        }
        Ok(o) => {
            reporter.warn(&format!(
                "could not create virtual environment: {}",
                String::from_utf8_lossy(&o.stderr).trim()
            ));
            VenvStatus::Failed
        }
        Err(e) => {
            reporter.warn(&format!("could not create virtual environment: {e}"));
            VenvStatus::Failed
        }
    }
}

/// Create or update `<base>/.env`.
///
/// Seeded keys are upserted, `HUGGINGFACE_TOKEN` is only inserted when
/// missing, and the notes block is appended once. The file is rewritten
/// only when its contents change.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written.
pub fn write_env_file(
    fs: &impl HostFs,
    base_dir: &Path,
    env: &ConfigLayer,
    reporter: &impl ProgressReporter,
) -> Result<EnvFileReport> {
    let path = base_dir.join(ENV_FILE);
    let existed = fs.exists(&path);
    let original = if existed {
        fs.read_to_string(&path)?
    } else {
        String::new()
    };
    let mut doc = EnvDocument::parse(&original);
    let mut report = EnvFileReport::default();

    let mut record = |key: &str, edit: Edit| match edit {
        Edit::Inserted => report.inserted.push(key.to_string()),
        Edit::Updated => report.updated.push(key.to_string()),
        Edit::Unchanged => {}
    };

    let base = base_dir.to_string_lossy();
    record(
        names::PROJECT_BASE_DIR,
        doc.upsert(names::PROJECT_BASE_DIR, &base)?,
    );
    for &key in SEEDED_KEYS {
        let value = env
            .value(key)
            .map(String::from)
            .or_else(|| seeded_default(key))
            .unwrap_or_default();
        record(key, doc.upsert(key, &value)?);
    }
    let token = env.value(names::HUGGINGFACE_TOKEN).unwrap_or_default();
    record(
        names::HUGGINGFACE_TOKEN,
        doc.insert_if_missing(names::HUGGINGFACE_TOKEN, token)?,
    );
    report.notes_added = doc.append_block_once(NOTES_MARKER, NOTES_BODY);
    report.token_set = doc
        .get(names::HUGGINGFACE_TOKEN)
        .is_some_and(|t| !t.trim().is_empty());

    let rendered = doc.render();
    if !existed || rendered != original {
        fs.write(&path, &rendered)
            .with_context(|| format!("writing {}", path.display()))?;
        report.written = true;
    }
    fs.set_permissions(&path, 0o600)?;

    if report.written {
        reporter.success(&format!("{} updated", path.display()));
    } else {
        reporter.success(&format!("{} up to date", path.display()));
    }
    if !report.token_set {
        reporter.warn(&format!(
            "HUGGINGFACE_TOKEN is empty; edit {} before running start-llm",
            path.display()
        ));
    }
    Ok(report)
}

/// Write the default `.gitignore` unless one exists. Returns `true` if it
/// was created.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn ensure_gitignore(
    fs: &impl HostFs,
    base_dir: &Path,
    reporter: &impl ProgressReporter,
) -> Result<bool> {
    let path = base_dir.join(GITIGNORE_FILE);
    if fs.exists(&path) {
        reporter.success(&format!("{} kept", path.display()));
        return Ok(false);
    }
    fs.write(&path, GITIGNORE)?;
    reporter.success(&format!("{} created", path.display()));
    Ok(true)
}
