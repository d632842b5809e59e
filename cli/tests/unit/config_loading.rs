//! Configuration loading from the real process environment and `.env` files.
//!
//! These tests mutate process-wide environment variables, so each one is
//! `#[serial]`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use jobagent_cli::application::services::config_service::load_config;
use jobagent_cli::domain::error::LifecycleError;
use jobagent_cli::infra::config::EnvConfigSource;
use jobagent_common::keys::names;
use serial_test::serial;

const TOUCHED: &[&str] = &[
    names::PROJECT_BASE_DIR,
    names::OPENAI_PORT,
    names::CONTAINER_NAME,
    names::ENGINE_DIR,
    names::MODEL_ENGINE_DIR,
    names::HUGGINGFACE_TOKEN,
    names::LLM_API_URL,
];

/// Sets variables for the lifetime of the guard and clears every key in
/// `TOUCHED` on drop.
struct EnvGuard;

impl EnvGuard {
    fn set(vars: &[(&str, &str)]) -> Self {
        clear();
        for (k, v) in vars {
            // SAFETY: callers are `#[serial]`; no other thread reads the
            // environment while the guard is alive.
            #[allow(unsafe_code)]
            unsafe {
                std::env::set_var(k, v);
            }
        }
        Self
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        clear();
    }
}

fn clear() {
    for k in TOUCHED {
        // SAFETY: see `EnvGuard::set`.
        #[allow(unsafe_code)]
        unsafe {
            std::env::remove_var(k);
        }
    }
}

fn write_env(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join(".env");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
#[serial]
fn environment_beats_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_env(dir.path(), "OPENAI_PORT=9001\nCONTAINER_NAME=from_file\n");
    let _env = EnvGuard::set(&[("OPENAI_PORT", "9100")]);

    let cfg = load_config(&EnvConfigSource, Some(&file), dir.path()).unwrap();

    assert_eq!(cfg.port, 9100);
    assert_eq!(cfg.container_name, "from_file");
    assert_eq!(cfg.llm_api_url, "http://localhost:9100/v1/chat/completions");
}

#[test]
#[serial]
fn empty_environment_value_falls_through_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_env(dir.path(), "CONTAINER_NAME=from_file\n");
    let _env = EnvGuard::set(&[("CONTAINER_NAME", "")]);

    let cfg = load_config(&EnvConfigSource, Some(&file), dir.path()).unwrap();

    assert_eq!(cfg.container_name, "from_file");
}

#[test]
#[serial]
fn env_file_found_through_project_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    write_env(dir.path(), "HUGGINGFACE_TOKEN=hf_file\n");
    let base = dir.path().display().to_string();
    let _env = EnvGuard::set(&[("PROJECT_BASE_DIR", &base)]);

    let cfg = load_config(&EnvConfigSource, None, Path::new("/nonexistent")).unwrap();

    assert_eq!(cfg.base_dir, dir.path());
    assert_eq!(cfg.huggingface_token, "hf_file");
}

#[test]
#[serial]
fn legacy_engine_key_in_file_is_honoured() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_env(dir.path(), "MODEL_ENGINE_DIR=/legacy/engine\n");
    let _env = EnvGuard::set(&[]);

    let cfg = load_config(&EnvConfigSource, Some(&file), dir.path()).unwrap();

    assert_eq!(cfg.engine_dir, Path::new("/legacy/engine"));
}

#[test]
#[serial]
fn engine_dir_in_file_beats_legacy_key_in_env() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_env(dir.path(), "ENGINE_DIR=/file/engine\n");
    let _env = EnvGuard::set(&[(names::MODEL_ENGINE_DIR, "/legacy/env")]);

    let cfg = load_config(&EnvConfigSource, Some(&file), dir.path()).unwrap();

    assert_eq!(cfg.engine_dir, Path::new("/file/engine"));
}

#[test]
#[serial]
fn missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let _env = EnvGuard::set(&[]);

    let cfg = load_config(&EnvConfigSource, None, dir.path()).unwrap();

    assert_eq!(cfg.base_dir, dir.path());
    assert_eq!(cfg.container_name, "trt_llm_server");
    assert_eq!(cfg.port, 8000);
    assert!(!cfg.has_token());
}

#[test]
#[serial]
fn invalid_port_is_typed_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_env(dir.path(), "OPENAI_PORT=eighty\n");
    let _env = EnvGuard::set(&[]);

    let err = load_config(&EnvConfigSource, Some(&file), dir.path()).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<LifecycleError>(),
        Some(LifecycleError::InvalidPort { .. })
    ));
}

#[test]
#[serial]
fn port_boundaries_in_file() {
    let _env = EnvGuard::set(&[]);
    for port in [1u16, 8000, u16::MAX] {
        let dir = tempfile::tempdir().unwrap();
        let file = write_env(dir.path(), &format!("OPENAI_PORT={port}\n"));
        let cfg = load_config(&EnvConfigSource, Some(&file), dir.path()).unwrap();
        assert_eq!(cfg.port, port);
    }
}
