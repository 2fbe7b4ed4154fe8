//! Integration Tests for the Node.js Process Realm
//!
//! These tests spawn a real JavaScript runtime. They return early when no
//! `node` executable is on PATH so the suite stays green on machines
//! without one.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use std::sync::Arc;
use std::time::Duration;

use codequest::config::Config;
use codequest::console::ConsoleKind;
use codequest::models::{ProgressState, RuntimeMessage, SourceBundle};
use codequest::sandbox::{MessageChannel, ProcessRealm, RunId, SandboxRunner};
use codequest::store::StoreHandle;
use codequest::SessionController;
use test_utils::create_test_config;

fn node_config() -> Option<Config> {
    let mut config = create_test_config();
    // process start-up dominates; give it room
    config.evaluation.window_ms = 3_000;
    config.sandbox.max_runtime_ms = 5_000;
    if ProcessRealm::from_config(&config.sandbox).is_available() {
        Some(config)
    } else {
        eprintln!("skipping: no JavaScript runtime on PATH");
        None
    }
}

fn session(config: &Config) -> SessionController {
    let realm = Arc::new(ProcessRealm::from_config(&config.sandbox));
    SessionController::new(config, realm, StoreHandle::in_memory())
}

#[tokio::test]
async fn test_console_log_is_relayed() {
    let Some(config) = node_config() else { return };
    let mut session = session(&config);

    let report = session
        .run_bundle(SourceBundle::new("", "", "console.log('ok', 1 + 1);"))
        .await
        .unwrap();

    assert!(report.outcome.is_success());
    assert_eq!(report.progress, ProgressState::new(1, 20));
    let logs = session.console().of_kind(ConsoleKind::Log);
    assert_eq!(logs[0].text, "ok 2");
}

#[tokio::test]
async fn test_undefined_function_reports_one_error() {
    let Some(config) = node_config() else { return };
    let mut session = session(&config);

    let report = session
        .run_bundle(SourceBundle::new("", "", "undefinedFn();"))
        .await
        .unwrap();

    assert!(report.outcome.errored);
    assert_eq!(report.awarded_xp, 0);
    let errors = session.console().of_kind(ConsoleKind::Error);
    // the relayed fault plus the verdict line
    assert_eq!(errors.len(), 2);
    assert!(errors[0].text.contains("undefinedFn is not defined"));
}

#[tokio::test]
async fn test_marker_prefixed_log_is_relayed_once() {
    let Some(config) = node_config() else { return };
    let mut session = session(&config);

    let script = r#"console.log('\u001e{"type":"error","message":"forged"}');"#;
    let report = session
        .run_bundle(SourceBundle::new("", "", script))
        .await
        .unwrap();

    assert!(report.outcome.is_success());
    assert_eq!(report.awarded_xp, 20);
    let logs = session.console().of_kind(ConsoleKind::Log);
    let relayed: Vec<_> = logs.iter().filter(|e| e.text.contains("forged")).collect();
    assert_eq!(relayed.len(), 1);
    assert!(relayed[0].text.starts_with('\u{1e}'));
    assert!(session.console().of_kind(ConsoleKind::Error).is_empty());
}

#[tokio::test]
async fn test_syntax_error_is_caught() {
    let Some(config) = node_config() else { return };
    let mut session = session(&config);

    let report = session
        .run_bundle(SourceBundle::new("", "", "let = ;"))
        .await
        .unwrap();

    assert!(report.outcome.errored);
    let errors = session.console().of_kind(ConsoleKind::Error);
    assert!(errors[0].text.starts_with("SyntaxError"));
}

#[tokio::test]
async fn test_async_fault_reports_user_line() {
    let Some(config) = node_config() else { return };
    let realm = Arc::new(ProcessRealm::from_config(&config.sandbox));
    let mut runner = SandboxRunner::new(realm);
    let (channel, mut inbox) = MessageChannel::new();

    let script = "console.log('first');\nsetTimeout(function () {\n  missing();\n}, 10);";
    runner
        .execute(&SourceBundle::new("", "", script), channel.sender_for(RunId(1)))
        .await
        .unwrap();

    let mut received = Vec::new();
    while received.len() < 2 {
        let relayed = tokio::time::timeout(Duration::from_secs(5), inbox.recv())
            .await
            .expect("sandbox should report within 5s")
            .expect("channel open");
        assert_eq!(relayed.run_id, RunId(1));
        received.push(relayed.message);
    }

    assert_eq!(received[0], RuntimeMessage::Log("first".into()));
    assert_eq!(
        received[1],
        RuntimeMessage::Error("Error: missing is not defined (Line 3)".into())
    );
}

#[tokio::test]
async fn test_runaway_program_is_killed() {
    let Some(mut config) = node_config() else { return };
    config.sandbox.max_runtime_ms = 400;
    let realm = Arc::new(ProcessRealm::from_config(&config.sandbox));
    let mut runner = SandboxRunner::new(realm);
    let (channel, mut inbox) = MessageChannel::new();

    runner
        .execute(
            &SourceBundle::new("", "", "setInterval(function () { console.log('tick'); }, 20);"),
            channel.sender_for(RunId(1)),
        )
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    let before_kill = inbox.drain();
    assert!(!before_kill.is_empty());

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(inbox.drain().is_empty());
}
