//! Fixed project layout produced by the bootstrapper.

use std::path::{Path, PathBuf};

/// Subdirectories created under the base path, in creation order.
pub const SUBDIRS: &[&str] = &[
    "config",
    "data",
    "logs",
    "resumes/customized",
    "resumes/base",
    "scrapers",
    "agents",
    "tools",
    "scripts",
];

/// Virtual environment directory, relative to the base path.
pub const VENV_DIR: &str = "venv";

/// Configuration file name, relative to the base path.
pub const ENV_FILE: &str = ".env";

/// Ignore-list file name, relative to the base path.
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Agent entry point, relative to the base path.
pub const AGENT_ENTRY: &str = "main.py";

/// Marker line that identifies the notes block in `.env`.
pub const NOTES_MARKER: &str = "# --- jobagent notes ---";

/// Notes appended once after [`NOTES_MARKER`].
pub const NOTES_BODY: &[&str] = &[
    "# HUGGINGFACE_TOKEN must be filled in by hand; jobagent-setup never overwrites it.",
    "# Values exported in the shell take precedence over this file.",
    "# MODEL_ENGINE_DIR is still read when ENGINE_DIR is unset.",
    "# Uncomment to share the Hugging Face download cache with the container:",
    "# HUGGINGFACE_CACHE_DIR=/path/to/.cache/huggingface",
];

/// Default `.gitignore` contents. Written only when the file is absent.
pub const GITIGNORE: &str = "\
# secrets
.env

# python
venv/
__pycache__/
*.pyc

# generated
logs/
data/
resumes/customized/
";

/// A system package the bootstrapper checks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredPackage {
    pub name: &'static str,
    pub purpose: &'static str,
    /// Critical packages get an error-level report when they cannot be
    /// installed; the run still continues.
    pub critical: bool,
}

/// Packages verified by the bootstrapper, in install order.
pub const REQUIRED_PACKAGES: &[RequiredPackage] = &[
    RequiredPackage {
        name: "python3-venv",
        purpose: "virtual environment",
        critical: true,
    },
    RequiredPackage {
        name: "libreoffice",
        purpose: "resume document conversion",
        critical: false,
    },
];

/// Absolute paths of every subdirectory under `base`.
#[must_use]
pub fn subdir_paths(base: &Path) -> Vec<PathBuf> {
    SUBDIRS.iter().map(|d| base.join(d)).collect()
}
