//! Toolchain subprocess runner
//!
//! Runs one external build/upload command to completion and forwards its
//! output, line by line, to the application message channel. The runner only
//! observes the child process; it writes nothing itself. Every failure mode
//! is converted into messages on the channel, so nothing escapes the worker
//! task.

use log::debug;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::models::{Job, JobStatus, OutputMessage};

pub struct ProcessRunner;

impl ProcessRunner {
    /// Spawn a worker task that runs `job` to completion. The caller never
    /// blocks; all output and the terminal status arrive on `tx`.
    pub fn spawn(job: Job, tx: mpsc::UnboundedSender<OutputMessage>) -> JoinHandle<()> {
        tokio::spawn(async move {
            Self::run(job, tx).await;
        })
    }

    async fn run(job: Job, tx: mpsc::UnboundedSender<OutputMessage>) {
        let program = match job.command.first() {
            Some(program) => program.clone(),
            None => {
                let _ = tx.send(OutputMessage::BuildLine(
                    "--- ERROR: empty toolchain command ---".to_string(),
                ));
                let _ = tx.send(OutputMessage::JobFinished(JobStatus::Failed(None)));
                return;
            }
        };

        if which::which(&program).is_err() {
            let _ = tx.send(OutputMessage::BuildLine(format!(
                "--- ERROR: '{}' not found. Is the toolchain on your PATH? ---",
                program
            )));
            let _ = tx.send(OutputMessage::JobFinished(JobStatus::Failed(None)));
            return;
        }

        debug!("running {} job: {:?}", job.kind.name(), job.command);

        let mut cmd = Command::new(&program);
        cmd.args(&job.command[1..])
            .current_dir(&job.working_dir)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped());

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                let _ = tx.send(OutputMessage::BuildLine(format!("--- ERROR: {} ---", e)));
                let _ = tx.send(OutputMessage::JobFinished(JobStatus::Failed(None)));
                return;
            }
        };

        // stdout and stderr both feed the build stream
        let mut readers = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            readers.push(Self::forward_lines(stdout, tx.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(Self::forward_lines(stderr, tx.clone()));
        }

        let status = child.wait().await;

        // every output line must be forwarded before the terminal sentinel
        for reader in readers {
            let _ = reader.await;
        }

        match status {
            Ok(status) if status.success() => {
                let _ = tx.send(OutputMessage::BuildLine("--- SUCCESS ---".to_string()));
                let _ = tx.send(OutputMessage::JobFinished(JobStatus::Succeeded));
            }
            Ok(status) => {
                let code = status.code();
                let sentinel = match code {
                    Some(code) => format!("--- FAILED (exit code {}) ---", code),
                    None => "--- FAILED (terminated by signal) ---".to_string(),
                };
                let _ = tx.send(OutputMessage::BuildLine(sentinel));
                let _ = tx.send(OutputMessage::JobFinished(JobStatus::Failed(code)));
            }
            Err(e) => {
                let _ = tx.send(OutputMessage::BuildLine(format!("--- ERROR: {} ---", e)));
                let _ = tx.send(OutputMessage::JobFinished(JobStatus::Failed(None)));
            }
        }
    }

    fn forward_lines<R>(stream: R, tx: mpsc::UnboundedSender<OutputMessage>) -> JoinHandle<()>
    where
        R: tokio::io::AsyncRead + Unpin + Send + 'static,
    {
        tokio::spawn(async move {
            let mut reader = BufReader::new(stream);
            let mut buffer = String::new();
            loop {
                buffer.clear();
                match reader.read_line(&mut buffer).await {
                    Ok(0) => break,
                    Ok(_) => {
                        // only line terminators are stripped; the rest of the
                        // line is forwarded exactly as the tool printed it
                        let line = buffer.trim_end_matches(&['\r', '\n'][..]).to_string();
                        let _ = tx.send(OutputMessage::BuildLine(line));
                    }
                    Err(e) => {
                        let _ = tx.send(OutputMessage::BuildLine(format!("--- ERROR: {} ---", e)));
                        break;
                    }
                }
            }
        })
    }
}
