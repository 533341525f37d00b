// tests/process_runner.rs
#![cfg(unix)]

use std::error::Error;
use std::sync::Arc;
use std::time::{Duration, Instant};

use scanqueue::exec::{CommandTemplate, ProcessRunner, ScanCommand};
use scanqueue::types::ExecutionResult;
use scanqueue_test_utils::sink::MemorySink;
use scanqueue_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn sh(script: &str) -> ScanCommand {
    ScanCommand::new("sh", vec!["-c".to_string(), script.to_string()])
}

fn runner() -> (ProcessRunner, MemorySink) {
    let sink = MemorySink::new();
    (ProcessRunner::new(Arc::new(sink.clone())), sink)
}

#[tokio::test]
async fn fast_process_succeeds_and_flushes_output_in_order() {
    init_tracing();
    let (runner, sink) = runner();

    let result = with_timeout(runner.run(
        &sh("echo one; echo two 1>&2; echo three; echo four 1>&2"),
        Duration::from_secs(10),
    ))
    .await;

    assert_eq!(result, ExecutionResult::Success { exit_code: Some(0) });
    assert_eq!(sink.lines(), vec!["one", "two", "three", "four"]);
}

#[tokio::test]
async fn many_lines_arrive_exactly_once() {
    init_tracing();
    let (runner, sink) = runner();

    let result = with_timeout(runner.run(
        &sh("i=0; while [ $i -lt 500 ]; do echo line-$i; i=$((i+1)); done"),
        Duration::from_secs(10),
    ))
    .await;

    assert!(result.is_success());
    let expected: Vec<String> = (0..500).map(|i| format!("line-{i}")).collect();
    assert_eq!(sink.lines(), expected);
}

#[tokio::test]
async fn nonzero_exit_is_still_success_with_code() {
    init_tracing();
    let (runner, sink) = runner();

    let result = with_timeout(runner.run(&sh("echo failing; exit 3"), Duration::from_secs(10))).await;

    assert_eq!(result, ExecutionResult::Success { exit_code: Some(3) });
    assert_eq!(result.to_string(), "process exited with status 3");
    assert_eq!(sink.lines(), vec!["failing"]);
}

#[tokio::test]
async fn partial_last_line_is_forwarded() {
    init_tracing();
    let (runner, sink) = runner();

    let result = with_timeout(runner.run(&sh("printf 'a\\nb'"), Duration::from_secs(10))).await;

    assert!(result.is_success());
    assert_eq!(sink.lines(), vec!["a", "b"]);
}

#[tokio::test]
async fn slow_process_times_out_and_is_killed() -> TestResult {
    init_tracing();
    let (runner, sink) = runner();

    // `exec` keeps the pid, so the first line is the pid of the sleeping process.
    let started = Instant::now();
    let result = with_timeout(runner.run(
        &sh("echo $$; exec sleep 30"),
        Duration::from_millis(500),
    ))
    .await;

    assert_eq!(result, ExecutionResult::Timeout);
    assert!(started.elapsed() < Duration::from_secs(5));

    let lines = sink.lines();
    let pid = lines.first().ok_or("process printed no pid")?.trim().to_string();
    let alive = std::process::Command::new("sh")
        .args(["-c", &format!("kill -0 {pid}")])
        .stderr(std::process::Stdio::null())
        .status()?
        .success();
    assert!(!alive, "process {pid} still running after timeout");

    Ok(())
}

#[tokio::test]
async fn background_descendant_holding_output_does_not_extend_deadline() {
    init_tracing();
    let (runner, sink) = runner();

    let started = Instant::now();
    let result = with_timeout(runner.run(
        &sh("sleep 4 & echo started"),
        Duration::from_millis(500),
    ))
    .await;

    assert_eq!(result, ExecutionResult::Success { exit_code: Some(0) });
    assert!(
        started.elapsed() < Duration::from_millis(1500),
        "run took {:?}",
        started.elapsed()
    );
    assert_eq!(sink.lines(), vec!["started"]);
}

#[tokio::test]
async fn timeout_kills_forked_helpers_too() -> TestResult {
    init_tracing();
    let (runner, _sink) = runner();

    let dir = tempfile::tempdir()?;
    let marker = dir.path().join("survived");
    let script = format!(
        "(sleep 1; echo late > '{}') & exec sleep 30",
        marker.display()
    );

    let result = with_timeout(runner.run(&sh(&script), Duration::from_millis(300))).await;
    assert_eq!(result, ExecutionResult::Timeout);

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(!marker.exists(), "helper kept running after the timeout");

    Ok(())
}

#[tokio::test]
async fn missing_executable_reports_error_without_hanging() {
    init_tracing();
    let (runner, sink) = runner();

    let cmd = ScanCommand::new("/nonexistent/scanner-binary", vec!["--url".to_string()]);
    let result = with_timeout(runner.run(&cmd, Duration::from_secs(10))).await;

    match result {
        ExecutionResult::Error(desc) => {
            assert!(desc.contains("failed to spawn"), "{desc}");
            assert!(desc.contains("/nonexistent/scanner-binary"), "{desc}");
        }
        other => panic!("expected Error, got {other:?}"),
    }
    assert!(sink.lines().is_empty());
}

#[tokio::test]
async fn locator_reaches_process_as_single_literal_argument() {
    init_tracing();
    let (runner, sink) = runner();

    let template = CommandTemplate::new(
        "sh",
        vec![
            "-c".to_string(),
            "echo \"argc=$#\"; printf '%s\\n' \"$1\"".to_string(),
            "scanner".to_string(),
        ],
        None,
        vec![],
    );
    let hostile = "\"; rm -rf / ; echo $(whoami) `id`";
    let cmd = template.build(hostile).unwrap();

    let result = with_timeout(runner.run(&cmd, Duration::from_secs(10))).await;

    assert!(result.is_success());
    assert_eq!(sink.lines(), vec!["argc=1".to_string(), hostile.to_string()]);
}

#[tokio::test]
async fn invalid_utf8_output_is_forwarded_lossily() {
    init_tracing();
    let (runner, sink) = runner();

    let result = with_timeout(runner.run(
        &sh("printf 'ok\\n\\377\\376bad\\nafter\\n'"),
        Duration::from_secs(10),
    ))
    .await;

    assert!(result.is_success());
    let lines = sink.lines();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "ok");
    assert!(lines[1].ends_with("bad"));
    assert_eq!(lines[2], "after");
}
