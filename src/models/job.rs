//! Build/upload job models

use ratatui::style::Color;
use std::path::PathBuf;

/// Kind of toolchain job issued to the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Compile,
    Upload,
}

impl JobKind {
    pub fn name(&self) -> &'static str {
        match self {
            JobKind::Compile => "compile",
            JobKind::Upload => "upload",
        }
    }
}

/// One compile or upload request. Immutable once started.
#[derive(Debug, Clone)]
pub struct Job {
    pub kind: JobKind,
    /// Full argv, program first
    pub command: Vec<String>,
    pub working_dir: PathBuf,
}

/// Status of the orchestrator's device session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Idle,
    Running(JobKind),
    Succeeded,
    /// Nonzero exit code, or `None` when the process died without one
    /// (killed by a signal, or it could not be started at all)
    Failed(Option<i32>),
}

impl JobStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, JobStatus::Running(_))
    }

    pub fn color(&self) -> Color {
        match self {
            JobStatus::Idle => Color::Gray,
            JobStatus::Running(_) => Color::Yellow,
            JobStatus::Succeeded => Color::Green,
            JobStatus::Failed(_) => Color::Red,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            JobStatus::Idle => "⏳",
            JobStatus::Running(JobKind::Compile) => "⚙️ ",
            JobStatus::Running(JobKind::Upload) => "📡",
            JobStatus::Succeeded => "✅",
            JobStatus::Failed(_) => "❌",
        }
    }
}
