#![allow(dead_code)]

use std::io::{self, Read, Write};
use std::os::unix::io::AsRawFd;
use std::thread;
use std::time::{Duration, Instant};

use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::pty::{grantpt, posix_openpt, ptsname_r, unlockpt, PtyMaster};
use serial_loopback_lib::serial::{LineDevice, SerialTransport};

pub const DEADLINE: Duration = Duration::from_secs(2);

/// The far end of a pseudo-terminal; the slave path is what the transport opens.
pub struct Peer {
    pub master: PtyMaster,
    pub slave_path: String,
}

impl Peer {
    pub fn new() -> Self {
        let master = posix_openpt(OFlag::O_RDWR | OFlag::O_NOCTTY).expect("posix_openpt");
        grantpt(&master).expect("grantpt");
        unlockpt(&master).expect("unlockpt");
        let slave_path = ptsname_r(&master).expect("ptsname_r");
        fcntl(master.as_raw_fd(), FcntlArg::F_SETFL(OFlag::O_NONBLOCK)).expect("set O_NONBLOCK");
        Self { master, slave_path }
    }

    pub fn send(&mut self, data: &[u8]) {
        self.master.write_all(data).expect("write to pty master");
        self.master.flush().expect("flush pty master");
    }

    /// Read exactly `len` bytes that the transport put on the line.
    pub fn receive(&mut self, len: usize) -> Vec<u8> {
        let start = Instant::now();
        let mut out = Vec::new();
        let mut buf = [0u8; 256];
        while out.len() < len {
            assert!(start.elapsed() < DEADLINE, "timed out waiting for {} bytes, got {:?}", len, out);
            match self.master.read(&mut buf) {
                Ok(n) => out.extend_from_slice(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => thread::sleep(Duration::from_millis(2)),
                Err(e) => panic!("pty master read failed: {}", e),
            }
        }
        out
    }
}

/// Poll `read_available` until `len` bytes have arrived.
pub fn read_from<D: LineDevice>(transport: &mut SerialTransport<D>, len: usize) -> Vec<u8> {
    let start = Instant::now();
    let mut out = Vec::new();
    let mut buf = [0u8; 64];
    while out.len() < len {
        assert!(start.elapsed() < DEADLINE, "timed out waiting for {} bytes, got {:?}", len, out);
        let n = transport.read_available(&mut buf).expect("read_available");
        if n == 0 {
            thread::sleep(Duration::from_millis(2));
        }
        out.extend_from_slice(&buf[..n]);
    }
    out
}
