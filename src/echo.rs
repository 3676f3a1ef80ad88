//! Print-and-echo test loop.
//!
//! Polls the transport for incoming bytes, prints each chunk to an output sink and
//! sends it straight back, until the shared running flag is cleared.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::serial::{LineDevice, Result, SerialTransport};

pub const ECHO_BUFFER_SIZE: usize = 1000;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EchoStats {
    pub bytes_received: u64,
    pub bytes_sent: u64,
    pub read_errors: u64,
    pub write_errors: u64,
}

/// Run until `running` is cleared. Read and write failures are logged and counted,
/// never fatal.
pub fn run_echo<D, W>(
    transport: &mut SerialTransport<D>,
    running: &AtomicBool,
    out: &mut W,
    poll_interval: Duration,
) -> EchoStats
where
    D: LineDevice,
    W: Write,
{
    let mut buffer = [0u8; ECHO_BUFFER_SIZE];
    let mut stats = EchoStats::default();

    while running.load(Ordering::Relaxed) {
        let received = match transport.read_available(&mut buffer) {
            Ok(0) => {
                thread::sleep(poll_interval);
                continue;
            }
            Ok(n) => n,
            Err(e) => {
                log::error!("Error reading serial port: {}", e);
                stats.read_errors += 1;
                thread::sleep(poll_interval);
                continue;
            }
        };
        stats.bytes_received += received as u64;

        let data = &buffer[..received];
        if let Err(e) = print_chunk(out, data) {
            log::warn!("Failed to print received data: {}", e);
        }

        match send_all(transport, data, running, poll_interval) {
            Ok(sent) => stats.bytes_sent += sent as u64,
            Err(e) => {
                log::error!("Error writing serial port: {}", e);
                stats.write_errors += 1;
            }
        }
    }

    log::info!(
        "Echo loop stopped: {} bytes received, {} bytes sent",
        stats.bytes_received,
        stats.bytes_sent
    );
    stats
}

/// Keep offering the remainder after short writes. Gives up early, returning the
/// count so far, if `running` is cleared while the line is not accepting data.
pub fn send_all<D: LineDevice>(
    transport: &mut SerialTransport<D>,
    data: &[u8],
    running: &AtomicBool,
    poll_interval: Duration,
) -> Result<usize> {
    let mut sent = 0;
    while sent < data.len() {
        let n = transport.write(&data[sent..])?;
        sent += n;
        if n == 0 {
            if !running.load(Ordering::Relaxed) {
                break;
            }
            thread::sleep(poll_interval);
        }
    }
    Ok(sent)
}

fn print_chunk<W: Write>(out: &mut W, data: &[u8]) -> std::io::Result<()> {
    writeln!(out, ":::::::::::::::::: DATA RECEIVED :::::::::::::::::")?;
    writeln!(out, "Data: {}", String::from_utf8_lossy(data))?;
    writeln!(out, "::::::::::::::::::::::::::::::::::::::::::::::::::")?;
    out.flush()
}
