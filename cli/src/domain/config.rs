//! Configuration record and its precedence rules.
//!
//! Pure functions only: no I/O, no async, no filesystem access. The
//! infrastructure layer reads the process environment and the `.env` file
//! into two [`ConfigLayer`]s; [`AppConfig::resolve`] merges them once at
//! startup and everything downstream takes `&AppConfig`.

use std::path::{Path, PathBuf};

use jobagent_common::keys::{defaults, names};
use serde::Deserialize;

use crate::domain::error::LifecycleError;
use crate::domain::layout::VENV_DIR;

// ── Config layers ────────────────────────────────────────────────────────────

/// One source of configuration values.
///
/// Field names are the lower-cased `.env` keys, which is what `envy`
/// matches against.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ConfigLayer {
    pub project_base_dir: Option<String>,
    pub engine_dir: Option<String>,
    pub model_engine_dir: Option<String>,
    pub tokenizer_dir: Option<String>,
    pub tllm_image: Option<String>,
    pub container_name: Option<String>,
    pub openai_port: Option<String>,
    pub force_build: Option<String>,
    pub huggingface_token: Option<String>,
    pub huggingface_cache_dir: Option<String>,
    pub llm_api_url: Option<String>,
}

impl ConfigLayer {
    /// Non-empty value for a recognized key name, e.g. `"ENGINE_DIR"`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        let field = match key {
            names::PROJECT_BASE_DIR => &self.project_base_dir,
            names::ENGINE_DIR => &self.engine_dir,
            names::MODEL_ENGINE_DIR => &self.model_engine_dir,
            names::TOKENIZER_DIR => &self.tokenizer_dir,
            names::TLLM_IMAGE => &self.tllm_image,
            names::CONTAINER_NAME => &self.container_name,
            names::OPENAI_PORT => &self.openai_port,
            names::FORCE_BUILD => &self.force_build,
            names::HUGGINGFACE_TOKEN => &self.huggingface_token,
            names::HUGGINGFACE_CACHE_DIR => &self.huggingface_cache_dir,
            names::LLM_API_URL => &self.llm_api_url,
            _ => return None,
        };
        field.as_deref().filter(|v| !v.is_empty())
    }
}

// ── Resolved config ──────────────────────────────────────────────────────────

/// Effective configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Project base directory (holds `.env`, `venv/`, and the agent entry point).
    pub base_dir: PathBuf,
    /// The `.env` file the file layer was read from (it may not exist).
    pub env_file: PathBuf,
    pub engine_dir: PathBuf,
    pub tokenizer_dir: PathBuf,
    pub image: String,
    pub container_name: String,
    pub port: u16,
    pub force_build: String,
    /// Empty when not configured; `start-llm` refuses to run without it.
    pub huggingface_token: String,
    /// Mounted into the container only when set.
    pub cache_dir: Option<PathBuf>,
    pub llm_api_url: String,
}

impl AppConfig {
    /// Merge the two layers: environment over file over built-in default.
    ///
    /// `ENGINE_DIR` additionally falls back to the legacy `MODEL_ENGINE_DIR`
    /// (environment, then file) before its default. The base directory falls
    /// back to `fallback_base`, normally the directory holding `env_file`.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidPort`] if `OPENAI_PORT` is not a
    /// non-zero `u16`.
    pub fn resolve(
        env: &ConfigLayer,
        file: &ConfigLayer,
        env_file: &Path,
        fallback_base: &Path,
    ) -> Result<Self, LifecycleError> {
        // An empty value counts as unset, like `${VAR:-default}` in a shell.
        let pick = |key: &str| env.value(key).or_else(|| file.value(key)).map(String::from);

        let base_dir = pick(names::PROJECT_BASE_DIR)
            .map_or_else(|| fallback_base.to_path_buf(), PathBuf::from);

        // The legacy key only applies once `ENGINE_DIR` is unset in both layers.
        let engine_dir = pick(names::ENGINE_DIR)
            .or_else(|| pick(names::MODEL_ENGINE_DIR))
            .unwrap_or_else(|| defaults::ENGINE_DIR.to_string());

        let port = match pick(names::OPENAI_PORT) {
            None => defaults::OPENAI_PORT,
            Some(raw) => parse_port(&raw)?,
        };

        Ok(Self {
            base_dir,
            env_file: env_file.to_path_buf(),
            engine_dir: PathBuf::from(engine_dir),
            tokenizer_dir: PathBuf::from(
                pick(names::TOKENIZER_DIR).unwrap_or_else(|| defaults::TOKENIZER_DIR.to_string()),
            ),
            image: pick(names::TLLM_IMAGE).unwrap_or_else(|| defaults::TLLM_IMAGE.to_string()),
            container_name: pick(names::CONTAINER_NAME)
                .unwrap_or_else(|| defaults::CONTAINER_NAME.to_string()),
            port,
            force_build: pick(names::FORCE_BUILD)
                .unwrap_or_else(|| defaults::FORCE_BUILD.to_string()),
            huggingface_token: pick(names::HUGGINGFACE_TOKEN).unwrap_or_default(),
            cache_dir: pick(names::HUGGINGFACE_CACHE_DIR).map(PathBuf::from),
            llm_api_url: pick(names::LLM_API_URL).unwrap_or_else(|| defaults::llm_api_url(port)),
        })
    }

    /// Directory of the agent's virtual environment.
    #[must_use]
    pub fn venv_dir(&self) -> PathBuf {
        self.base_dir.join(VENV_DIR)
    }

    /// Returns `true` if an authentication token is configured.
    #[must_use]
    pub fn has_token(&self) -> bool {
        !self.huggingface_token.trim().is_empty()
    }

    /// Directories that must exist on the host before the server can start,
    /// paired with the key that configures them.
    #[must_use]
    pub fn required_dirs(&self) -> [(&'static str, &Path); 2] {
        [
            (names::ENGINE_DIR, self.engine_dir.as_path()),
            (names::TOKENIZER_DIR, self.tokenizer_dir.as_path()),
        ]
    }

    /// Variables exported to the launched agent so it sees the same
    /// effective configuration as the lifecycle manager.
    #[must_use]
    pub fn agent_env(&self) -> Vec<(&'static str, String)> {
        vec![
            (names::PROJECT_BASE_DIR, self.base_dir.display().to_string()),
            (names::LLM_API_URL, self.llm_api_url.clone()),
            (names::OPENAI_PORT, self.port.to_string()),
            (names::ENGINE_DIR, self.engine_dir.display().to_string()),
            (names::TOKENIZER_DIR, self.tokenizer_dir.display().to_string()),
            (names::CONTAINER_NAME, self.container_name.clone()),
            (names::HUGGINGFACE_TOKEN, self.huggingface_token.clone()),
        ]
    }
}

fn parse_port(raw: &str) -> Result<u16, LifecycleError> {
    match raw.trim().parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(LifecycleError::InvalidPort {
            value: raw.to_string(),
        }),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
