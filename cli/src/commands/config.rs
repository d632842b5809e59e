//! `jobagent config`: show the effective configuration.

use std::process::ExitCode;

use anyhow::Result;
use serde::Serialize;

use crate::app::AppContext;
use crate::application::ports::HostFs;
use crate::domain::config::AppConfig;

/// Effective configuration as printed by `jobagent config`. The token is
/// reduced to whether it is set.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ConfigSummary {
    pub base_dir: String,
    pub env_file: String,
    pub env_file_exists: bool,
    pub llm_api_url: String,
    pub engine_dir: String,
    pub engine_dir_exists: bool,
    pub tokenizer_dir: String,
    pub tokenizer_dir_exists: bool,
    pub image: String,
    pub container_name: String,
    pub port: u16,
    pub force_build: String,
    pub cache_dir: Option<String>,
    pub huggingface_token_set: bool,
}

impl ConfigSummary {
    #[must_use]
    pub fn new(cfg: &AppConfig, fs: &impl HostFs) -> Self {
        Self {
            base_dir: cfg.base_dir.display().to_string(),
            env_file: cfg.env_file.display().to_string(),
            env_file_exists: fs.exists(&cfg.env_file),
            llm_api_url: cfg.llm_api_url.clone(),
            engine_dir: cfg.engine_dir.display().to_string(),
            engine_dir_exists: fs.is_dir(&cfg.engine_dir),
            tokenizer_dir: cfg.tokenizer_dir.display().to_string(),
            tokenizer_dir_exists: fs.is_dir(&cfg.tokenizer_dir),
            image: cfg.image.clone(),
            container_name: cfg.container_name.clone(),
            port: cfg.port,
            force_build: cfg.force_build.clone(),
            cache_dir: cfg.cache_dir.as_ref().map(|p| p.display().to_string()),
            huggingface_token_set: cfg.has_token(),
        }
    }
}

const KEY_WIDTH: usize = 22;

fn marked(path: &str, exists: bool) -> String {
    if exists {
        path.to_string()
    } else {
        format!("{path} (missing)")
    }
}

/// Run `jobagent config`.
///
/// # Errors
///
/// Returns an error if the JSON summary cannot be printed.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let summary = ConfigSummary::new(&app.config, &app.fs);
    if app.is_json() {
        crate::output::json::print(&summary)?;
        return Ok(ExitCode::SUCCESS);
    }

    let ctx = &app.output;
    ctx.header("Configuration");
    ctx.kv("PROJECT_BASE_DIR", &summary.base_dir, KEY_WIDTH);
    ctx.kv(
        "env file",
        &marked(&summary.env_file, summary.env_file_exists),
        KEY_WIDTH,
    );
    ctx.kv("LLM_API_URL", &summary.llm_api_url, KEY_WIDTH);
    ctx.kv(
        "ENGINE_DIR",
        &marked(&summary.engine_dir, summary.engine_dir_exists),
        KEY_WIDTH,
    );
    ctx.kv(
        "TOKENIZER_DIR",
        &marked(&summary.tokenizer_dir, summary.tokenizer_dir_exists),
        KEY_WIDTH,
    );
    ctx.kv("TLLM_IMAGE", &summary.image, KEY_WIDTH);
    ctx.kv("CONTAINER_NAME", &summary.container_name, KEY_WIDTH);
    ctx.kv("OPENAI_PORT", &summary.port.to_string(), KEY_WIDTH);
    ctx.kv("FORCE_BUILD", &summary.force_build, KEY_WIDTH);
    ctx.kv(
        "HUGGINGFACE_CACHE_DIR",
        summary.cache_dir.as_deref().unwrap_or("(not set)"),
        KEY_WIDTH,
    );
    ctx.kv(
        "HUGGINGFACE_TOKEN",
        if summary.huggingface_token_set {
            "(set)"
        } else {
            "(not set)"
        },
        KEY_WIDTH,
    );
    Ok(ExitCode::SUCCESS)
}
