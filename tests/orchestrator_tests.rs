//! Integration tests for the build orchestrator
//!
//! A shell command stands in for the toolchain, a temp directory for the
//! firmware project, and a nonexistent device path for the serial port (its
//! open failure is itself part of the observable message stream).

use robobench::config::{SerialConfig, ToolchainConfig};
use robobench::device::BuildOrchestrator;
use robobench::models::{JobStatus, OutputMessage};
use robobench::store::{JsonProgressStore, ProgressTracker};
use robobench::RoboBenchError;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;

fn shell_toolchain(script: &str) -> ToolchainConfig {
    ToolchainConfig {
        command: "sh".to_string(),
        compile_args: vec!["-c".to_string(), script.to_string()],
        upload_args: vec!["-c".to_string(), script.to_string()],
    }
}

fn test_serial() -> SerialConfig {
    SerialConfig {
        port: "/dev/robobench-no-such-port".to_string(),
        baud_rate: 115200,
        read_timeout_ms: 50,
        idle_sleep_ms: 5,
    }
}

struct RecordingTracker(Arc<Mutex<Vec<String>>>);

impl ProgressTracker for RecordingTracker {
    fn notify_unit_completed(&mut self, unit_id: &str) -> robobench::Result<()> {
        self.0.lock().unwrap().push(unit_id.to_string());
        Ok(())
    }
}

/// Drain messages like the UI pump does: apply JobFinished to the
/// orchestrator, return everything received up to that point.
async fn drain_job(
    orchestrator: &mut BuildOrchestrator,
    rx: &mut mpsc::UnboundedReceiver<OutputMessage>,
) -> Vec<OutputMessage> {
    let mut messages = Vec::new();
    while let Some(message) = rx.recv().await {
        let done = matches!(message, OutputMessage::JobFinished(_));
        if let OutputMessage::JobFinished(status) = &message {
            orchestrator.finish_job(*status);
        }
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

#[tokio::test]
async fn compile_writes_the_source_and_succeeds() {
    let project = TempDir::new().expect("failed to create temp dir");
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut orchestrator = BuildOrchestrator::new(
        project.path().to_path_buf(),
        shell_toolchain("exit 0"),
        test_serial(),
        tx,
        Box::new(RecordingTracker(Arc::default())),
    );

    let sketch = "void setup() {}\nvoid loop() {}\n";
    orchestrator.compile(sketch).expect("compile should start");
    assert!(orchestrator.is_running());

    let messages = drain_job(&mut orchestrator, &mut rx).await;

    assert!(!orchestrator.is_running());
    assert_eq!(orchestrator.status(), JobStatus::Succeeded);
    assert!(build_lines(&messages).contains(&"--- SUCCESS ---".to_string()));

    let written = std::fs::read_to_string(project.path().join("src").join("main.cpp")).unwrap();
    assert_eq!(written, sketch);
}

#[tokio::test]
async fn compile_failure_surfaces_the_exit_code() {
    let project = TempDir::new().expect("failed to create temp dir");
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut orchestrator = BuildOrchestrator::new(
        project.path().to_path_buf(),
        shell_toolchain("exit 1"),
        test_serial(),
        tx,
        Box::new(RecordingTracker(Arc::default())),
    );

    orchestrator.compile("int x;").expect("compile should start");
    let messages = drain_job(&mut orchestrator, &mut rx).await;

    assert!(!orchestrator.is_running());
    assert_eq!(orchestrator.status(), JobStatus::Failed(Some(1)));
    let lines = build_lines(&messages);
    assert!(
        lines.iter().any(|l| l.contains("FAILED") && l.contains("1")),
        "expected a failure sentinel with the code: {:?}",
        lines
    );
}

#[tokio::test]
async fn a_second_job_is_rejected_while_one_is_running() {
    let project = TempDir::new().expect("failed to create temp dir");
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut orchestrator = BuildOrchestrator::new(
        project.path().to_path_buf(),
        shell_toolchain("sleep 1"),
        test_serial(),
        tx,
        Box::new(RecordingTracker(Arc::default())),
    );

    orchestrator.compile("int x;").expect("first job starts");

    assert!(matches!(
        orchestrator.compile("int x;"),
        Err(RoboBenchError::Busy)
    ));
    assert!(matches!(
        orchestrator.upload("int x;").await,
        Err(RoboBenchError::Busy)
    ));

    let messages = drain_job(&mut orchestrator, &mut rx).await;
    assert!(!orchestrator.is_running());

    // exactly one job ran
    let sentinels = build_lines(&messages)
        .iter()
        .filter(|l| l.contains("SUCCESS"))
        .count();
    assert_eq!(sentinels, 1);
}

#[tokio::test]
async fn source_write_failure_aborts_before_spawning() {
    let project = TempDir::new().expect("failed to create temp dir");
    // a file where the src directory should be makes the write fail
    std::fs::write(project.path().join("src"), "not a directory").unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut orchestrator = BuildOrchestrator::new(
        project.path().to_path_buf(),
        shell_toolchain("exit 0"),
        test_serial(),
        tx,
        Box::new(RecordingTracker(Arc::default())),
    );

    assert!(matches!(
        orchestrator.compile("int x;"),
        Err(RoboBenchError::FileWrite(_))
    ));
    assert!(!orchestrator.is_running());
    assert!(rx.try_recv().is_err(), "no job should have started");
}

#[tokio::test]
async fn successful_upload_starts_the_monitor_and_credits_the_unit() {
    let project = TempDir::new().expect("failed to create temp dir");
    let calls = Arc::new(Mutex::new(Vec::new()));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut orchestrator = BuildOrchestrator::new(
        project.path().to_path_buf(),
        shell_toolchain("exit 0"),
        test_serial(),
        tx,
        Box::new(RecordingTracker(calls.clone())),
    );
    orchestrator.set_active_unit(Some("Semester 1/Level 3".to_string()));

    orchestrator.upload("int x;").await.expect("upload starts");
    drain_job(&mut orchestrator, &mut rx).await;
    assert_eq!(orchestrator.status(), JobStatus::Succeeded);

    // the auto-started monitor fails to open the fake port and exits
    orchestrator
        .monitor()
        .wait_closed(Duration::from_secs(2))
        .await;

    let mut serial_lines = Vec::new();
    while let Ok(message) = rx.try_recv() {
        if let OutputMessage::SerialLine(line) = message {
            serial_lines.push(line);
        }
    }
    assert!(
        serial_lines
            .iter()
            .any(|l| l.contains("Connecting to /dev/robobench-no-such-port")),
        "monitor should have announced the connection attempt: {:?}",
        serial_lines
    );

    assert_eq!(*calls.lock().unwrap(), vec!["Semester 1/Level 3"]);
}

#[tokio::test]
async fn failed_upload_neither_monitors_nor_credits() {
    let project = TempDir::new().expect("failed to create temp dir");
    let calls = Arc::new(Mutex::new(Vec::new()));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut orchestrator = BuildOrchestrator::new(
        project.path().to_path_buf(),
        shell_toolchain("exit 2"),
        test_serial(),
        tx,
        Box::new(RecordingTracker(calls.clone())),
    );
    orchestrator.set_active_unit(Some("Semester 1/Level 3".to_string()));

    orchestrator.upload("int x;").await.expect("upload starts");
    drain_job(&mut orchestrator, &mut rx).await;

    assert_eq!(orchestrator.status(), JobStatus::Failed(Some(2)));
    assert!(!orchestrator.monitor_is_open());
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn repeated_uploads_record_the_unit_once() {
    let project = TempDir::new().expect("failed to create temp dir");
    let progress_file = project.path().join("data").join("user_progress.json");
    let tracker = JsonProgressStore::new(&progress_file, "student@example.com");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut orchestrator = BuildOrchestrator::new(
        project.path().to_path_buf(),
        shell_toolchain("exit 0"),
        test_serial(),
        tx,
        Box::new(tracker),
    );
    orchestrator.set_active_unit(Some("Semester 1/Level 1".to_string()));

    for _ in 0..2 {
        orchestrator.upload("int x;").await.expect("upload starts");
        drain_job(&mut orchestrator, &mut rx).await;
        assert_eq!(orchestrator.status(), JobStatus::Succeeded);
    }

    let progress = JsonProgressStore::new(&progress_file, "student@example.com")
        .user_progress()
        .unwrap();
    assert_eq!(progress.completed_levels, vec!["Semester 1/Level 1"]);
}
