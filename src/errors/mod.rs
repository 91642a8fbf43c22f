//! Error types for RoboBench

pub mod types;

pub use types::*;
