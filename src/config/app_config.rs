//! Application configuration management

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{Result, RoboBenchError};
use crate::models::JobKind;

/// Main application configuration, read from `robobench.toml` when present
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// The firmware project the editor buffer is built from
    pub project_dir: PathBuf,
    /// Directory holding the curriculum and progress data files
    pub data_dir: PathBuf,
    /// Content-sync server URL
    pub server_url: String,
    /// Local user identity for progress records
    pub user: String,
    pub toolchain: ToolchainConfig,
    pub serial: SerialConfig,
    pub tutor: TutorConfig,
}

/// The external build/upload tool and its per-job arguments
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    pub command: String,
    pub compile_args: Vec<String>,
    pub upload_args: Vec<String>,
}

/// Serial monitor parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    pub port: String,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
    pub idle_sleep_ms: u64,
}

/// Local AI tutor engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorConfig {
    pub base_url: String,
    pub model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("Robotics"),
            data_dir: PathBuf::from("data"),
            server_url: "http://localhost:5000".to_string(),
            user: "student@local".to_string(),
            toolchain: ToolchainConfig::default(),
            serial: SerialConfig::default(),
            tutor: TutorConfig::default(),
        }
    }
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            command: "pio".to_string(),
            compile_args: vec!["run".to_string()],
            upload_args: vec![
                "run".to_string(),
                "--target".to_string(),
                "upload".to_string(),
            ],
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: 115200,
            read_timeout_ms: 1000,
            idle_sleep_ms: 50,
        }
    }
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "phi3".to_string(),
        }
    }
}

impl ToolchainConfig {
    /// Full argv for the given job kind, program first
    pub fn command_for(&self, kind: JobKind) -> Vec<String> {
        let mut argv = vec![self.command.clone()];
        match kind {
            JobKind::Compile => argv.extend(self.compile_args.iter().cloned()),
            JobKind::Upload => argv.extend(self.upload_args.iter().cloned()),
        }
        argv
    }
}

impl AppConfig {
    /// Load the configuration. An explicitly given path must exist; the
    /// implicit `./robobench.toml` is optional and defaults apply without it.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let candidate = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("robobench.toml"));
        if candidate.exists() {
            let text = fs::read_to_string(&candidate)?;
            Ok(toml::from_str(&text)?)
        } else if path.is_some() {
            Err(RoboBenchError::Config(format!(
                "config file not found: {}",
                candidate.display()
            )))
        } else {
            Ok(Self::default())
        }
    }

    pub fn curriculum_file(&self) -> PathBuf {
        self.data_dir.join("learning_data.json")
    }

    pub fn progress_file(&self) -> PathBuf {
        self.data_dir.join("user_progress.json")
    }

    /// Where the editor buffer is persisted before every job
    pub fn source_file(&self) -> PathBuf {
        self.project_dir.join("src").join("main.cpp")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_platformio() {
        let config = AppConfig::default();
        assert_eq!(
            config.toolchain.command_for(JobKind::Compile),
            vec!["pio", "run"]
        );
        assert_eq!(
            config.toolchain.command_for(JobKind::Upload),
            vec!["pio", "run", "--target", "upload"]
        );
    }

    #[test]
    fn partial_config_files_keep_defaults_for_the_rest() {
        let config: AppConfig = toml::from_str(
            r#"
            user = "teacher@school"

            [serial]
            port = "/dev/ttyACM0"
            "#,
        )
        .unwrap();
        assert_eq!(config.user, "teacher@school");
        assert_eq!(config.serial.port, "/dev/ttyACM0");
        assert_eq!(config.serial.baud_rate, 115200);
        assert_eq!(config.toolchain.command, "pio");
    }
}
