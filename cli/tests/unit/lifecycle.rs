//! Container lifecycle state machine against a stateful fake docker.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use jobagent_cli::application::services::container::{
    self, LogsOutcome, StartOutcome, StopOutcome,
};
use jobagent_cli::domain::error::LifecycleError;
use jobagent_common::ContainerState;

use crate::helpers::{DirsFs, FakeDocker, RecordingReporter, config_under};

fn ready_fs(root: &Path) -> DirsFs {
    DirsFs(vec![root.join("engine"), root.join("tokenizer")])
}

#[tokio::test]
async fn start_from_absent_launches_once() {
    let root = Path::new("/models");
    let cfg = config_under(root);
    let docker = FakeDocker::new(ContainerState::Absent);

    let outcome = container::start(&docker, &ready_fs(root), &cfg, &RecordingReporter::default())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        StartOutcome::Started {
            replaced_stopped: false
        }
    );
    assert_eq!(docker.mutations(), ["run"]);
    let spec = docker.launched.borrow().clone().unwrap();
    assert_eq!(spec.name, "llm_test");
}

#[tokio::test]
async fn start_twice_is_idempotent() {
    let root = Path::new("/models");
    let cfg = config_under(root);
    let fs = ready_fs(root);
    let docker = FakeDocker::new(ContainerState::Absent);
    let reporter = RecordingReporter::default();

    container::start(&docker, &fs, &cfg, &reporter).await.unwrap();
    let second = container::start(&docker, &fs, &cfg, &reporter).await.unwrap();

    assert_eq!(second, StartOutcome::AlreadyRunning);
    assert_eq!(docker.mutations(), ["run"]);
}

#[tokio::test]
async fn start_replaces_stopped_container() {
    let root = Path::new("/models");
    let cfg = config_under(root);
    let docker = FakeDocker::new(ContainerState::Stopped);

    let outcome = container::start(&docker, &ready_fs(root), &cfg, &RecordingReporter::default())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        StartOutcome::Started {
            replaced_stopped: true
        }
    );
    assert_eq!(docker.mutations(), ["rm", "run"]);
}

#[tokio::test]
async fn missing_engine_dir_fails_before_runtime_calls() {
    let root = Path::new("/models");
    let cfg = config_under(root);
    let docker = FakeDocker::new(ContainerState::Absent);
    let fs = DirsFs(vec![root.join("tokenizer")]);

    let err = container::start(&docker, &fs, &cfg, &RecordingReporter::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<LifecycleError>(),
        Some(LifecycleError::MissingPath { key: "ENGINE_DIR", .. })
    ));
    assert!(docker.calls.borrow().is_empty(), "no docker call expected");
}

#[tokio::test]
async fn empty_token_fails_before_runtime_calls() {
    let root = Path::new("/models");
    let mut cfg = config_under(root);
    cfg.huggingface_token = "  ".to_string();
    let docker = FakeDocker::new(ContainerState::Absent);

    let err = container::start(&docker, &ready_fs(root), &cfg, &RecordingReporter::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<LifecycleError>(),
        Some(LifecycleError::MissingToken { .. })
    ));
    assert!(docker.calls.borrow().is_empty());
}

#[tokio::test]
async fn failed_launch_surfaces_runtime_message() {
    let root = Path::new("/models");
    let cfg = config_under(root);
    let docker = FakeDocker::failing_run(ContainerState::Absent);

    let err = container::start(&docker, &ready_fs(root), &cfg, &RecordingReporter::default())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("conflict"), "got: {err}");
}

#[tokio::test]
async fn stop_absent_is_noop() {
    let docker = FakeDocker::new(ContainerState::Absent);
    let outcome = container::stop(&docker, "llm_test", &RecordingReporter::default())
        .await
        .unwrap();
    assert_eq!(outcome, StopOutcome::NotFound);
    assert!(docker.mutations().is_empty());
}

#[tokio::test]
async fn stop_running_sends_stop() {
    let docker = FakeDocker::new(ContainerState::Running);
    let outcome = container::stop(&docker, "llm_test", &RecordingReporter::default())
        .await
        .unwrap();
    assert_eq!(outcome, StopOutcome::Stopped);
    assert_eq!(docker.mutations(), ["stop"]);
}

#[tokio::test]
async fn restart_is_stop_then_start() {
    let root = Path::new("/models");
    let cfg = config_under(root);
    let docker = FakeDocker::new(ContainerState::Running);

    let outcome = container::restart(&docker, &ready_fs(root), &cfg, &RecordingReporter::default())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        StartOutcome::Started {
            replaced_stopped: false
        }
    );
    assert_eq!(docker.mutations(), ["stop", "run"]);
    assert_eq!(*docker.state.borrow(), ContainerState::Running);

    let fresh = FakeDocker::new(ContainerState::Absent);
    container::start(&fresh, &ready_fs(root), &cfg, &RecordingReporter::default())
        .await
        .unwrap();
    assert_eq!(*docker.launched.borrow(), *fresh.launched.borrow());
    assert!(docker.launched.borrow().is_some());
}

#[tokio::test]
async fn restart_with_missing_dirs_leaves_server_down() {
    let root = Path::new("/models");
    let cfg = config_under(root);
    let docker = FakeDocker::new(ContainerState::Running);

    let result =
        container::restart(&docker, &DirsFs(Vec::new()), &cfg, &RecordingReporter::default())
            .await;

    assert!(result.is_err());
    assert_eq!(docker.mutations(), ["stop"]);
    assert_eq!(*docker.state.borrow(), ContainerState::Absent);
}

#[tokio::test]
async fn status_follows_logs_only_when_container_exists() {
    let absent = FakeDocker::new(ContainerState::Absent);
    assert_eq!(
        container::follow_logs(&absent, "llm_test").await.unwrap(),
        LogsOutcome::NotFound
    );
    assert!(!absent.calls.borrow().iter().any(|c| c == "logs"));

    let stopped = FakeDocker::new(ContainerState::Stopped);
    assert_eq!(
        container::follow_logs(&stopped, "llm_test").await.unwrap(),
        LogsOutcome::Ended
    );
    assert!(stopped.calls.borrow().iter().any(|c| c == "logs"));
}
