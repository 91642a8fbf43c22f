//! Headless compile command

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::device::BuildOrchestrator;
use crate::models::{JobStatus, OutputMessage};
use crate::store::content::ContentStore;
use crate::store::{JsonContentStore, JsonProgressStore};

/// Execute the compile command
pub async fn execute_compile_command(
    config: &AppConfig,
    file: Option<PathBuf>,
    unit: Option<String>,
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

    orchestrator.compile(&source)?;
    drain_until_finished(&mut orchestrator, &mut rx).await;

    exit_status(&orchestrator)
}

/// Resolve what to build: an explicit unit's sketch, an explicit file, or
/// the project's current source file.
pub(crate) fn resolve_source(
    config: &AppConfig,
    file: Option<PathBuf>,
    unit: Option<String>,
) -> Result<(String, Option<String>)> {
    if let Some(unit) = unit {
        let (semester, level) = unit
            .split_once('/')
            .context("unit must be given as \"<semester>/<level>\"")?;
        let curriculum = JsonContentStore::new(config.curriculum_file()).load()?;
        let found = curriculum
            .level(semester, level)
            .with_context(|| format!("unknown curriculum unit: {}", unit))?;
        return Ok((found.implementation.code.clone(), Some(unit)));
    }

    let path = file.unwrap_or_else(|| config.source_file());
    let source = fs::read_to_string(&path)
        .with_context(|| format!("failed to read sketch {}", path.display()))?;
    Ok((source, None))
}

/// Print messages until the job's terminal status arrives, then apply it.
pub(crate) async fn drain_until_finished(
    orchestrator: &mut BuildOrchestrator,
    rx: &mut mpsc::UnboundedReceiver<OutputMessage>,
) {
    while let Some(message) = rx.recv().await {
        match message {
            OutputMessage::BuildLine(line) | OutputMessage::SerialLine(line) => {
                println!("{}", line)
            }
            OutputMessage::JobFinished(status) => {
                orchestrator.finish_job(status);
                break;
            }
        }
    }
}

pub(crate) fn exit_status(orchestrator: &BuildOrchestrator) -> Result<()> {
    match orchestrator.status() {
        JobStatus::Failed(Some(code)) => anyhow::bail!("job failed with exit code {}", code),
        JobStatus::Failed(None) => anyhow::bail!("job failed"),
        _ => Ok(()),
    }
}
