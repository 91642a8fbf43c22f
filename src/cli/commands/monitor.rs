//! Headless serial monitor command

use anyhow::Result;
use log::info;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::device::SerialMonitor;
use crate::models::OutputMessage;

/// Execute the monitor command: stream serial lines until Ctrl+C
pub async fn execute_monitor_command(config: &AppConfig) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut monitor = SerialMonitor::with_timings(
        tx,
        Duration::from_millis(config.serial.read_timeout_ms),
        Duration::from_millis(config.serial.idle_sleep_ms),
    );

    info!(
        "starting serial monitor on {} at {} baud",
        config.serial.port, config.serial.baud_rate
    );
    monitor.start(&config.serial.port, config.serial.baud_rate);
    println!("--- Press Ctrl+C to stop monitoring ---");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            message = rx.recv() => match message {
                Some(OutputMessage::SerialLine(line)) => println!("{}", line),
                Some(_) => {}
                None => break,
            },
        }
    }

    monitor.stop();
    monitor.wait_closed(Duration::from_secs(2)).await;
    while let Ok(OutputMessage::SerialLine(line)) = rx.try_recv() {
        println!("{}", line);
    }
    Ok(())
}
