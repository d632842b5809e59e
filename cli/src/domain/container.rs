//! Launch specification for the inference-server container.
//!
//! Pure data: builds the `docker run` argument list from an [`AppConfig`].
//! Optional mounts are modelled as list entries, never as string fragments.

use std::path::PathBuf;

use jobagent_common::keys::names;

use crate::domain::config::AppConfig;

/// In-container path of the engine directory.
pub const ENGINE_MOUNT: &str = "/engine";
/// In-container path of the tokenizer directory.
pub const TOKENIZER_MOUNT: &str = "/tokenizer";
/// In-container path of the Hugging Face cache.
pub const CACHE_MOUNT: &str = "/root/.cache/huggingface";
/// OpenAI-compatible server program inside the image.
pub const SERVER_PROGRAM: &str = "trtllm-serve";

/// A host directory bind-mounted into the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub host: PathBuf,
    pub container: &'static str,
    pub read_only: bool,
}

impl Mount {
    /// `-v` argument value, e.g. `/mnt/engine:/engine:ro`.
    #[must_use]
    pub fn volume_arg(&self) -> String {
        let suffix = if self.read_only { ":ro" } else { "" };
        format!("{}:{}{suffix}", self.host.display(), self.container)
    }
}

/// Everything needed to create the managed container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub name: String,
    pub image: String,
    pub mounts: Vec<Mount>,
    pub env: Vec<(&'static str, String)>,
    pub command: Vec<String>,
}

impl LaunchSpec {
    /// Build the launch spec for the configured inference server.
    #[must_use]
    pub fn from_config(cfg: &AppConfig) -> Self {
        let mut mounts = vec![
            Mount {
                host: cfg.engine_dir.clone(),
                container: ENGINE_MOUNT,
                read_only: true,
            },
            Mount {
                host: cfg.tokenizer_dir.clone(),
                container: TOKENIZER_MOUNT,
                read_only: true,
            },
        ];
        if let Some(cache) = &cfg.cache_dir {
            mounts.push(Mount {
                host: cache.clone(),
                container: CACHE_MOUNT,
                read_only: false,
            });
        }

        Self {
            name: cfg.container_name.clone(),
            image: cfg.image.clone(),
            mounts,
            env: vec![
                (names::HUGGINGFACE_TOKEN, cfg.huggingface_token.clone()),
                (names::FORCE_BUILD, cfg.force_build.clone()),
            ],
            command: vec![
                SERVER_PROGRAM.to_string(),
                ENGINE_MOUNT.to_string(),
                "--tokenizer".to_string(),
                TOKENIZER_MOUNT.to_string(),
                "--host".to_string(),
                "0.0.0.0".to_string(),
                "--port".to_string(),
                cfg.port.to_string(),
            ],
        }
    }

    /// Arguments for `docker`, starting with `run`.
    ///
    /// Detached, removed on stop, GPU runtime, host networking.
    #[must_use]
    pub fn run_args(&self) -> Vec<String> {
        let mut args: Vec<String> = [
            "run",
            "-d",
            "--rm",
            "--name",
            self.name.as_str(),
            "--runtime",
            "nvidia",
            "--network",
            "host",
        ]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
        for mount in &self.mounts {
            args.push("-v".to_string());
            args.push(mount.volume_arg());
        }
        for (key, value) in &self.env {
            args.push("-e".to_string());
            args.push(format!("{key}={value}"));
        }
        args.push(self.image.clone());
        args.extend(self.command.iter().cloned());
        args
    }
}
