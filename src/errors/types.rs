//! Custom error types for RoboBench

use std::fmt;

/// Main error type for RoboBench operations
#[derive(Debug)]
pub enum RoboBenchError {
    /// Configuration related errors
    Config(String),
    /// Curriculum content store errors
    Content(String),
    /// Progress tracking errors
    Progress(String),
    /// A build or upload was requested while one is already running
    Busy,
    /// Writing the sketch source file failed before a job could start
    FileWrite(std::io::Error),
    /// Build/upload job errors
    Build(String),
    /// Serial monitor errors
    Serial(String),
    /// Sync server communication errors
    Remote(String),
    /// Session store errors
    Session(String),
    /// AI tutor errors
    Tutor(String),
    /// General I/O errors
    Io(std::io::Error),
    /// Serialization errors
    Serialization(String),
}

impl fmt::Display for RoboBenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoboBenchError::Config(msg) => write!(f, "Configuration error: {}", msg),
            RoboBenchError::Content(msg) => write!(f, "Content error: {}", msg),
            RoboBenchError::Progress(msg) => write!(f, "Progress error: {}", msg),
            RoboBenchError::Busy => write!(f, "A build or upload is already running"),
            RoboBenchError::FileWrite(err) => {
                write!(f, "Failed to write sketch source file: {}", err)
            }
            RoboBenchError::Build(msg) => write!(f, "Build error: {}", msg),
            RoboBenchError::Serial(msg) => write!(f, "Serial error: {}", msg),
            RoboBenchError::Remote(msg) => write!(f, "Sync server error: {}", msg),
            RoboBenchError::Session(msg) => write!(f, "Session error: {}", msg),
            RoboBenchError::Tutor(msg) => write!(f, "Tutor error: {}", msg),
            RoboBenchError::Io(err) => write!(f, "I/O error: {}", err),
            RoboBenchError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for RoboBenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RoboBenchError::Io(err) => Some(err),
            RoboBenchError::FileWrite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RoboBenchError {
    fn from(err: std::io::Error) -> Self {
        RoboBenchError::Io(err)
    }
}

impl From<serde_json::Error> for RoboBenchError {
    fn from(err: serde_json::Error) -> Self {
        RoboBenchError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for RoboBenchError {
    fn from(err: toml::de::Error) -> Self {
        RoboBenchError::Serialization(err.to_string())
    }
}

/// Result type alias for RoboBench operations
pub type Result<T> = std::result::Result<T, RoboBenchError>;
