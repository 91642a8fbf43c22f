//! Headless upload command

use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::cli::commands::compile::{drain_until_finished, exit_status, resolve_source};
use crate::config::AppConfig;
use crate::device::BuildOrchestrator;
use crate::models::{JobStatus, OutputMessage};
use crate::store::JsonProgressStore;

/// Execute the upload command. A successful upload hands the port to the
/// serial monitor unless `--no-monitor` was given.
pub async fn execute_upload_command(
    config: &AppConfig,
    file: Option<PathBuf>,
    unit: Option<String>,
    no_monitor: bool,
) -> Result<()> {
    let (source, unit_id) = resolve_source(config, file, unit)?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let tracker = JsonProgressStore::new(config.progress_file(), &config.user);
    let mut orchestrator = BuildOrchestrator::new(
        config.project_dir.clone(),
        config.toolchain.clone(),
        config.serial.clone(),
        tx,
        Box::new(tracker),
    );
    orchestrator.set_active_unit(unit_id);

    orchestrator.upload(&source).await?;
    drain_until_finished(&mut orchestrator, &mut rx).await;

    if orchestrator.status() == JobStatus::Succeeded && !no_monitor {
        println!("--- Press Ctrl+C to stop monitoring ---");
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                message = rx.recv() => match message {
                    Some(OutputMessage::BuildLine(line))
                    | Some(OutputMessage::SerialLine(line)) => println!("{}", line),
                    Some(OutputMessage::JobFinished(status)) => orchestrator.finish_job(status),
                    None => break,
                },
            }
        }
        orchestrator.monitor().stop();
        orchestrator
            .monitor()
            .wait_closed(Duration::from_secs(2))
            .await;
        while let Ok(message) = rx.try_recv() {
            if let OutputMessage::SerialLine(line) = message {
                println!("{}", line);
            }
        }
    } else if no_monitor {
        // the auto-started monitor is not wanted; shut it down again
        orchestrator.monitor().stop();
        orchestrator
            .monitor()
            .wait_closed(Duration::from_secs(2))
            .await;
    }

    exit_status(&orchestrator)
}
