//! Command Line Interface module
//!
//! This module contains the CLI argument parsing, command implementations,
//! and the Terminal User Interface (TUI) components.

pub mod args;
pub mod commands;
pub mod tui;

pub use args::*;

use anyhow::Result;

use crate::config::AppConfig;
use crate::utils::logging;

/// Main CLI application runner
pub async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let tui_mode = cli.command.is_none() && !cli.cli;
    logging::init_logging(cli.verbose, cli.quiet, tui_mode)?;

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(port) = &cli.port {
        config.serial.port = port.clone();
    }
    if let Some(baud) = cli.baud {
        config.serial.baud_rate = baud;
    }

    match &cli.command {
        Some(command) => commands::execute_command(command.clone(), &config).await,
        None => {
            if cli.cli {
                commands::list::execute_list_command(&config).await
            } else {
                tui::run_tui(config).await
            }
        }
    }
}
