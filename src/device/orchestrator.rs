//! Build orchestrator
//!
//! Owns one logical device session: persists the editor buffer before each
//! job, launches the toolchain runner, and hands the serial port between the
//! monitor and the upload tool. At most one job runs at a time; a second
//! request is rejected synchronously. Orchestrator state is only mutated on
//! the consumer side of the message queue (`finish_job`), so no locking is
//! needed.

use log::{info, warn};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::{SerialConfig, ToolchainConfig};
use crate::device::monitor::SerialMonitor;
use crate::device::runner::ProcessRunner;
use crate::errors::{Result, RoboBenchError};
use crate::models::{Job, JobKind, JobStatus, OutputMessage};
use crate::store::progress::ProgressTracker;

/// How long an upload waits for the monitor to release the serial port
const PORT_RELEASE_TIMEOUT: Duration = Duration::from_secs(2);

pub struct BuildOrchestrator {
    project_dir: PathBuf,
    toolchain: ToolchainConfig,
    serial: SerialConfig,
    tx: mpsc::UnboundedSender<OutputMessage>,
    monitor: SerialMonitor,
    status: JobStatus,
    active_unit: Option<String>,
    tracker: Box<dyn ProgressTracker>,
}

impl BuildOrchestrator {
    pub fn new(
        project_dir: PathBuf,
        toolchain: ToolchainConfig,
        serial: SerialConfig,
        tx: mpsc::UnboundedSender<OutputMessage>,
        tracker: Box<dyn ProgressTracker>,
    ) -> Self {
        let monitor = SerialMonitor::with_timings(
            tx.clone(),
            Duration::from_millis(serial.read_timeout_ms),
            Duration::from_millis(serial.idle_sleep_ms),
        );
        Self {
            project_dir,
            toolchain,
            serial,
            tx,
            monitor,
            status: JobStatus::Idle,
            active_unit: None,
            tracker,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status.is_running()
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// Unit credited with completion when an upload succeeds
    pub fn set_active_unit(&mut self, unit: Option<String>) {
        self.active_unit = unit;
    }

    pub fn monitor(&mut self) -> &mut SerialMonitor {
        &mut self.monitor
    }

    /// Whether the serial monitor currently holds the port open
    pub fn monitor_is_open(&self) -> bool {
        self.monitor.is_open()
    }

    /// Path the editor buffer is persisted to before every job
    pub fn source_file(&self) -> PathBuf {
        self.project_dir.join("src").join("main.cpp")
    }

    pub fn compile(&mut self, source: &str) -> Result<()> {
        self.start_job(JobKind::Compile, source)
    }

    /// Upload stops any live monitor first and waits for the port to
    /// release: the upload tool needs exclusive access to the device.
    pub async fn upload(&mut self, source: &str) -> Result<()> {
        if self.is_running() {
            return Err(RoboBenchError::Busy);
        }
        self.monitor.stop();
        self.monitor.wait_closed(PORT_RELEASE_TIMEOUT).await;
        self.start_job(JobKind::Upload, source)
    }

    fn start_job(&mut self, kind: JobKind, source: &str) -> Result<()> {
        if self.is_running() {
            return Err(RoboBenchError::Busy);
        }
        self.write_source(source)?;

        let job = Job {
            kind,
            command: self.toolchain.command_for(kind),
            working_dir: self.project_dir.clone(),
        };
        info!("starting {} job: {:?}", kind.name(), job.command);

        self.status = JobStatus::Running(kind);
        ProcessRunner::spawn(job, self.tx.clone());
        Ok(())
    }

    fn write_source(&self, source: &str) -> Result<()> {
        let path = self.source_file();
        let write = || -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, source)
        };
        write().map_err(RoboBenchError::FileWrite)
    }

    /// Apply a terminal job status. Called by the UI pump when it drains a
    /// `JobFinished` message. A successful upload hands the port back to the
    /// monitor and credits the active unit exactly once.
    pub fn finish_job(&mut self, status: JobStatus) {
        let finished = match self.status {
            JobStatus::Running(kind) => Some(kind),
            _ => None,
        };
        self.status = status;

        if finished == Some(JobKind::Upload) && status == JobStatus::Succeeded {
            self.monitor.start(&self.serial.port, self.serial.baud_rate);
            if let Some(unit) = self.active_unit.clone() {
                if let Err(e) = self.tracker.notify_unit_completed(&unit) {
                    warn!("failed to record completion of {}: {}", unit, e);
                }
            }
        }
    }
}
