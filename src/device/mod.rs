//! Device-facing build, upload, and serial monitor orchestration

pub mod monitor;
pub mod orchestrator;
pub mod runner;

pub use monitor::SerialMonitor;
pub use orchestrator::BuildOrchestrator;
pub use runner::ProcessRunner;
