//! Messages produced by device workers and drained by the UI pump

use crate::models::job::JobStatus;

/// Output messages crossing from worker tasks into the UI.
///
/// Each producer preserves its own emission order; there is no ordering
/// guarantee between the build stream and the serial stream.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputMessage {
    /// One line of toolchain output (stdout or stderr)
    BuildLine(String),
    /// One decoded line from the serial device
    SerialLine(String),
    /// Terminal status of the current build/upload job
    JobFinished(JobStatus),
}
