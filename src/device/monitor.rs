//! Serial monitor worker
//!
//! One blocking worker thread per monitor lifetime reads line-oriented data
//! from the serial device and forwards decoded lines to the application
//! message channel. Cancellation is cooperative: `stop()` flips a shared
//! flag that the read loop checks once per iteration, so stop latency is
//! bounded by the read timeout plus the idle sleep.

use log::warn;
use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::models::OutputMessage;

/// Serial connection parameters for one monitor lifetime
#[derive(Debug, Clone)]
pub struct SerialSession {
    pub port: String,
    pub baud_rate: u32,
}

pub struct SerialMonitor {
    tx: mpsc::UnboundedSender<OutputMessage>,
    read_timeout: Duration,
    idle_sleep: Duration,
    stop: Arc<AtomicBool>,
    open: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl SerialMonitor {
    pub fn new(tx: mpsc::UnboundedSender<OutputMessage>) -> Self {
        Self::with_timings(tx, Duration::from_secs(1), Duration::from_millis(50))
    }

    pub fn with_timings(
        tx: mpsc::UnboundedSender<OutputMessage>,
        read_timeout: Duration,
        idle_sleep: Duration,
    ) -> Self {
        Self {
            tx,
            read_timeout,
            idle_sleep,
            stop: Arc::new(AtomicBool::new(false)),
            open: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Start a monitor worker for the given port. The serial device is a
    /// singleton resource, so any previous worker is asked to stop first.
    pub fn start(&mut self, port: &str, baud_rate: u32) {
        self.stop();

        let stop = Arc::new(AtomicBool::new(false));
        let open = Arc::new(AtomicBool::new(false));
        self.stop = stop.clone();
        self.open = open.clone();

        let session = SerialSession {
            port: port.to_string(),
            baud_rate,
        };
        let tx = self.tx.clone();
        let read_timeout = self.read_timeout;
        let idle_sleep = self.idle_sleep;

        self.worker = Some(tokio::task::spawn_blocking(move || {
            read_loop(session, read_timeout, idle_sleep, stop, open, tx);
        }));
    }

    /// Request the worker to stop. Idempotent, never blocks, and safe to
    /// call on a monitor that was never started.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Whether the worker currently holds the port open
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Relaxed)
    }

    /// Wait until the worker has exited and released the port, bounded by
    /// `timeout`. Returns immediately if no worker is live.
    pub async fn wait_closed(&mut self, timeout: Duration) {
        if let Some(worker) = self.worker.take() {
            if tokio::time::timeout(timeout, worker).await.is_err() {
                warn!("serial monitor did not release the port within {:?}", timeout);
            }
        }
    }
}

fn read_loop(
    session: SerialSession,
    read_timeout: Duration,
    idle_sleep: Duration,
    stop: Arc<AtomicBool>,
    open: Arc<AtomicBool>,
    tx: mpsc::UnboundedSender<OutputMessage>,
) {
    let _ = tx.send(OutputMessage::SerialLine(format!(
        "--- Connecting to {} at {} baud ---",
        session.port, session.baud_rate
    )));

    let mut port = match serialport::new(&session.port, session.baud_rate)
        .timeout(read_timeout)
        .open()
    {
        Ok(port) => port,
        Err(e) => {
            let _ = tx.send(OutputMessage::SerialLine(format!(
                "--- Serial error: {} ---",
                e
            )));
            return;
        }
    };
    open.store(true, Ordering::Relaxed);

    let mut pending: Vec<u8> = Vec::new();
    let mut chunk = [0u8; 256];

    while !stop.load(Ordering::Relaxed) {
        let waiting = match port.bytes_to_read() {
            Ok(waiting) => waiting,
            Err(e) => {
                let _ = tx.send(OutputMessage::SerialLine(format!(
                    "--- Serial error: {} ---",
                    e
                )));
                break;
            }
        };
        if waiting == 0 {
            std::thread::sleep(idle_sleep);
            continue;
        }

        match port.read(&mut chunk) {
            Ok(0) => {}
            Ok(n) => {
                pending.extend_from_slice(&chunk[..n]);
                while let Some(pos) = pending.iter().position(|&b| b == b'\n') {
                    let raw: Vec<u8> = pending.drain(..=pos).collect();
                    // best-effort decode: invalid bytes are replaced
                    let line = String::from_utf8_lossy(&raw).trim_end().to_string();
                    if !line.is_empty() {
                        let _ = tx.send(OutputMessage::SerialLine(line));
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {}
            Err(e) => {
                let _ = tx.send(OutputMessage::SerialLine(format!(
                    "--- Serial error: {} ---",
                    e
                )));
                break;
            }
        }
    }

    drop(port);
    open.store(false, Ordering::Relaxed);
    let _ = tx.send(OutputMessage::SerialLine("--- Serial port closed ---".to_string()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn stop_before_start_is_a_no_op() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut monitor = SerialMonitor::new(tx);

        monitor.stop();
        monitor.stop();
        monitor.wait_closed(Duration::from_millis(100)).await;

        assert!(rx.try_recv().is_err(), "no messages expected");
        assert!(!monitor.is_open());
    }

    #[tokio::test]
    async fn open_failure_is_reported_without_a_close_message() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut monitor = SerialMonitor::with_timings(
            tx,
            Duration::from_millis(50),
            Duration::from_millis(5),
        );

        monitor.start("/dev/robobench-no-such-port", 115200);
        monitor.wait_closed(Duration::from_secs(2)).await;

        let mut lines = Vec::new();
        while let Ok(OutputMessage::SerialLine(line)) = rx.try_recv() {
            lines.push(line);
        }
        assert_eq!(lines.len(), 2, "expected connect attempt + error: {:?}", lines);
        assert!(lines[0].contains("Connecting to /dev/robobench-no-such-port"));
        assert!(lines[1].contains("Serial error"));
        assert!(
            !lines.iter().any(|l| l.contains("closed")),
            "port never opened, so no close message"
        );
    }
}
