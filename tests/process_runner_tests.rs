//! Integration tests for the toolchain subprocess runner
//!
//! These tests drive ProcessRunner with small shell commands standing in for
//! the real build tool, and assert on the exact message stream it produces.

use robobench::device::ProcessRunner;
use robobench::models::{Job, JobKind, JobStatus, OutputMessage};
use tempfile::TempDir;
use tokio::sync::mpsc;

fn shell_job(script: &str) -> Job {
    Job {
        kind: JobKind::Compile,
        command: vec!["sh".to_string(), "-c".to_string(), script.to_string()],
        working_dir: std::env::temp_dir(),
    }
}

/// Collect every message up to and including the terminal JobFinished
async fn run_and_collect(job: Job) -> Vec<OutputMessage> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    ProcessRunner::spawn(job, tx);

    let mut messages = Vec::new();
    while let Some(message) = rx.recv().await {
        let done = matches!(message, OutputMessage::JobFinished(_));
        messages.push(message);
        if done {
            break;
        }
    }
    messages
}

fn build_lines(messages: &[OutputMessage]) -> Vec<String> {
    messages
        .iter()
        .filter_map(|message| match message {
            OutputMessage::BuildLine(line) => Some(line.clone()),
            _ => None,
        })
        .collect()
}

fn terminal_status(messages: &[OutputMessage]) -> JobStatus {
    match messages.last() {
        Some(OutputMessage::JobFinished(status)) => *status,
        other => panic!("expected JobFinished as last message, got {:?}", other),
    }
}

#[tokio::test]
async fn zero_exit_maps_to_succeeded() {
    let messages = run_and_collect(shell_job("exit 0")).await;

    assert_eq!(terminal_status(&messages), JobStatus::Succeeded);
    let lines = build_lines(&messages);
    assert_eq!(lines.last().unwrap(), "--- SUCCESS ---");
}

#[tokio::test]
async fn nonzero_exit_maps_to_failed_with_code() {
    let messages = run_and_collect(shell_job("exit 7")).await;

    assert_eq!(terminal_status(&messages), JobStatus::Failed(Some(7)));
    let lines = build_lines(&messages);
    assert!(
        lines.last().unwrap().contains("7"),
        "failure sentinel should carry the exit code: {:?}",
        lines
    );
}

#[tokio::test]
async fn output_lines_preserve_order_and_content() {
    let messages = run_and_collect(shell_job("printf 'alpha\\nbeta\\ngamma\\n'")).await;

    let lines = build_lines(&messages);
    // last line is the success sentinel
    assert_eq!(&lines[..lines.len() - 1], ["alpha", "beta", "gamma"]);
    assert_eq!(terminal_status(&messages), JobStatus::Succeeded);
}

#[tokio::test]
async fn stderr_is_merged_into_the_build_stream() {
    let messages = run_and_collect(shell_job("echo to-stdout; echo to-stderr 1>&2")).await;

    let lines = build_lines(&messages);
    assert!(lines.iter().any(|l| l == "to-stdout"), "{:?}", lines);
    assert!(lines.iter().any(|l| l == "to-stderr"), "{:?}", lines);
}

#[tokio::test]
async fn missing_executable_is_reported_as_a_message() {
    let job = Job {
        kind: JobKind::Compile,
        command: vec!["robobench-no-such-toolchain".to_string(), "run".to_string()],
        working_dir: std::env::temp_dir(),
    };
    let messages = run_and_collect(job).await;

    assert_eq!(terminal_status(&messages), JobStatus::Failed(None));
    let lines = build_lines(&messages);
    assert!(
        lines.iter().any(|l| l.contains("not found")),
        "expected a toolchain-missing line: {:?}",
        lines
    );
}

#[tokio::test]
async fn jobs_run_in_their_working_directory() {
    let dir = TempDir::new().expect("failed to create temp dir");
    std::fs::write(dir.path().join("sketch-marker"), "x").unwrap();

    let job = Job {
        kind: JobKind::Compile,
        command: vec![
            "sh".to_string(),
            "-c".to_string(),
            "test -f sketch-marker".to_string(),
        ],
        working_dir: dir.path().to_path_buf(),
    };
    let messages = run_and_collect(job).await;
    assert_eq!(terminal_status(&messages), JobStatus::Succeeded);
}
