//! CLI command implementations

pub mod compile;
pub mod list;
pub mod monitor;
pub mod sync;
pub mod upload;

use anyhow::Result;

use crate::cli::args::Commands;
use crate::config::AppConfig;

/// Execute a CLI command
pub async fn execute_command(command: Commands, config: &AppConfig) -> Result<()> {
    match command {
        Commands::List => list::execute_list_command(config).await,
        Commands::Compile { file, unit } => {
            compile::execute_compile_command(config, file, unit).await
        }
        Commands::Upload {
            file,
            unit,
            no_monitor,
        } => upload::execute_upload_command(config, file, unit, no_monitor).await,
        Commands::Monitor => monitor::execute_monitor_command(config).await,
        Commands::Sync {
            class_code,
            email,
            password,
        } => sync::execute_sync_command(config, &class_code, &email, &password).await,
    }
}
