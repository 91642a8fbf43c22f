//! Command line argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "robobench")]
#[command(
    about = "🤖 Robotics learning workbench - edit, build, upload, and monitor curriculum firmware"
)]
pub struct Cli {
    /// Path to a robobench.toml config file (./robobench.toml is picked up
    /// automatically when present)
    #[arg(long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Serial port override (e.g. /dev/ttyUSB0, COM3)
    #[arg(long, global = true)]
    pub port: Option<String>,

    /// Baud rate override
    #[arg(long, global = true)]
    pub baud: Option<u32>,

    /// Run in CLI mode without TUI - for automation and scripting
    #[arg(long, help = "Run in CLI mode without interactive TUI")]
    pub cli: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Decrease logging verbosity (only errors)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// List curriculum units and their progress (default CLI behavior)
    List,
    /// Compile a sketch without uploading
    Compile {
        /// Sketch file to build (defaults to the project's current source)
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Curriculum unit to build, as "<semester>/<level>"
        #[arg(short, long)]
        unit: Option<String>,
    },
    /// Compile and upload a sketch, then monitor serial output
    Upload {
        /// Sketch file to build (defaults to the project's current source)
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Curriculum unit to build, as "<semester>/<level>"
        #[arg(short, long)]
        unit: Option<String>,
        /// Exit after the upload instead of monitoring
        #[arg(long)]
        no_monitor: bool,
    },
    /// Monitor the serial port without building
    Monitor,
    /// Fetch a class curriculum from the sync server into the local store
    Sync {
        /// Class code to fetch
        #[arg(short = 'c', long)]
        class_code: String,
        /// Account email
        #[arg(long)]
        email: String,
        /// Account password
        #[arg(long)]
        password: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
