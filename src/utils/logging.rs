//! Logging utilities and initialization for RoboBench

use anyhow::Result;
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::io::Write;

/// Initialize logging. TUI mode logs to a file to avoid terminal
/// interference; CLI mode logs to stderr.
pub fn init_logging(verbose: u8, quiet: bool, tui_mode: bool) -> Result<()> {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };

    if tui_mode {
        init_file_logger(level)?;
    } else {
        Builder::from_default_env()
            .target(Target::Stderr)
            .filter_level(level)
            .format_timestamp_secs()
            .format_module_path(false)
            .init();
    }

    #[cfg(debug_assertions)]
    log_panics::init();

    log::debug!("robobench logging initialized with level: {:?}", level);
    Ok(())
}

/// File-based logging for TUI mode
fn init_file_logger(level: LevelFilter) -> Result<()> {
    use std::fs::OpenOptions;

    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("robobench")
        .join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = log_dir.join("robobench.log");
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    Builder::from_default_env()
        .target(Target::Pipe(Box::new(file)))
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                buf.timestamp(),
                record.level(),
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        })
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_flags_map_to_levels() {
        let level = match (true, 0) {
            (true, _) => LevelFilter::Error,
            (false, 0) => LevelFilter::Info,
            (false, 1) => LevelFilter::Debug,
            (false, _) => LevelFilter::Trace,
        };
        assert_eq!(level, LevelFilter::Error);

        let level = match (false, 2) {
            (true, _) => LevelFilter::Error,
            (false, 0) => LevelFilter::Info,
            (false, 1) => LevelFilter::Debug,
            (false, _) => LevelFilter::Trace,
        };
        assert_eq!(level, LevelFilter::Trace);
    }
}
