//! RoboBench - Desktop Robotics Learning Workbench
//!
//! RoboBench is a learning application for a beginner robotics curriculum:
//! browse semesters and levels, study concept material, edit the level's
//! firmware sketch, and compile, upload, and monitor it against a connected
//! microcontroller using the PlatformIO toolchain.

pub mod cli;
pub mod config;
pub mod device;
pub mod errors;
pub mod models;
pub mod remote;
pub mod services;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use errors::*;
pub use models::*;

/// RoboBench version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// RoboBench application name
pub const APP_NAME: &str = "robobench";
