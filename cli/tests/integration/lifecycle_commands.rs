//! Lifecycle commands run against an isolated base directory.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::Command;
use jobagent_common::keys::names;
use predicates::prelude::*;

/// Every configuration key, cleared so the host's shell cannot leak in.
const ALL_KEYS: &[&str] = &[
    names::PROJECT_BASE_DIR,
    names::ENGINE_DIR,
    names::MODEL_ENGINE_DIR,
    names::TOKENIZER_DIR,
    names::TLLM_IMAGE,
    names::CONTAINER_NAME,
    names::OPENAI_PORT,
    names::FORCE_BUILD,
    names::HUGGINGFACE_TOKEN,
    names::HUGGINGFACE_CACHE_DIR,
    names::LLM_API_URL,
    "JOBAGENT_ENV_FILE",
    "RUST_LOG",
];

fn jobagent(base: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("jobagent"));
    for key in ALL_KEYS {
        cmd.env_remove(key);
    }
    cmd.env("NO_COLOR", "1")
        .env(names::PROJECT_BASE_DIR, base)
        // Unlikely to exist on any test host.
        .env(names::CONTAINER_NAME, "jobagent_it_no_such_container");
    cmd
}

#[test]
fn config_json_reports_file_values_without_token() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".env"),
        "OPENAI_PORT=9123\nHUGGINGFACE_TOKEN=hf_do_not_print\n",
    )
    .unwrap();

    let assert = jobagent(dir.path())
        .args(["config", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hf_do_not_print").not());
    let v: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(v["port"], 9123);
    assert_eq!(v["huggingface_token_set"], true);
    assert_eq!(v["container_name"], "jobagent_it_no_such_container");
    assert_eq!(v["llm_api_url"], "http://localhost:9123/v1/chat/completions");
}

#[test]
fn explicit_env_file_flag_wins_over_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    let other = dir.path().join("other.env");
    std::fs::write(&other, "FORCE_BUILD=on\n").unwrap();

    let assert = jobagent(dir.path())
        .args(["config", "--json", "--env-file"])
        .arg(&other)
        .assert()
        .success();
    let v: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(v["force_build"], "on");
}

#[test]
fn invalid_port_fails_with_message() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".env"), "OPENAI_PORT=0\n").unwrap();

    jobagent(dir.path())
        .arg("config")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid OPENAI_PORT"));
}

#[test]
fn start_llm_without_engine_dir_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-engine");

    jobagent(dir.path())
        .env(names::ENGINE_DIR, &missing)
        .env(names::HUGGINGFACE_TOKEN, "hf_x")
        .arg("start-llm")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ENGINE_DIR does not exist"));
}

#[test]
fn start_llm_without_token_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let engine = dir.path().join("engine");
    let tokenizer = dir.path().join("tokenizer");
    std::fs::create_dir_all(&engine).unwrap();
    std::fs::create_dir_all(&tokenizer).unwrap();

    jobagent(dir.path())
        .env(names::ENGINE_DIR, &engine)
        .env(names::TOKENIZER_DIR, &tokenizer)
        .arg("start-llm")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("HUGGINGFACE_TOKEN is empty"));
}

#[test]
fn start_llm_json_error_object() {
    let dir = tempfile::tempdir().unwrap();

    let assert = jobagent(dir.path())
        .env(names::ENGINE_DIR, dir.path().join("missing"))
        .args(["start-llm", "--json"])
        .assert()
        .code(1);
    let v: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(v["error"], true);
    assert_eq!(v["code"], "MISSING_PATH");
}

#[test]
fn start_agent_without_venv_points_at_setup() {
    let dir = tempfile::tempdir().unwrap();

    jobagent(dir.path())
        .arg("start-agent")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("jobagent-setup"));
}

/// Install `script` as the venv interpreter under `base`.
#[cfg(unix)]
fn stub_interpreter(base: &Path, script: &str) {
    use std::os::unix::fs::PermissionsExt;

    let bin = base.join("venv/bin");
    std::fs::create_dir_all(&bin).unwrap();
    let python = bin.join("python");
    std::fs::write(&python, script).unwrap();
    std::fs::set_permissions(&python, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
#[test]
fn start_agent_exits_with_agent_status() {
    let dir = tempfile::tempdir().unwrap();
    // Checks the handed-over environment, then exits 7.
    stub_interpreter(
        dir.path(),
        "#!/bin/sh\n\
         test \"$1\" = main.py || exit 90\n\
         test -n \"$VIRTUAL_ENV\" || exit 91\n\
         test -n \"$LLM_API_URL\" || exit 92\n\
         exit 7\n",
    );

    jobagent(dir.path()).arg("start-agent").assert().code(7);
}

#[cfg(unix)]
#[test]
fn start_agent_json_keeps_stdout_clean() {
    let dir = tempfile::tempdir().unwrap();
    stub_interpreter(dir.path(), "#!/bin/sh\nexit 0\n");

    jobagent(dir.path())
        .args(["start-agent", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn status_json_reports_absent_container() {
    let dir = tempfile::tempdir().unwrap();

    let assert = jobagent(dir.path())
        .args(["status-llm", "--json"])
        .assert()
        .success();
    let v: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(v["container"], "jobagent_it_no_such_container");
    assert_eq!(v["state"], "absent");
}

#[test]
fn stop_llm_without_container_is_noop() {
    let dir = tempfile::tempdir().unwrap();

    jobagent(dir.path())
        .arg("stop-llm")
        .assert()
        .success()
        .stdout(predicate::str::contains("is not running"));
}

#[test]
fn check_llm_offline_exits_one() {
    let dir = tempfile::tempdir().unwrap();

    jobagent(dir.path())
        .env(names::LLM_API_URL, "http://127.0.0.1:9/v1/chat/completions")
        .args(["check-llm", "--json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"online\": false"));
}
