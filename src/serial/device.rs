use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::IntoRawFd;

use nix::fcntl::OFlag;
use nix::sys::termios::{self, FlushArg, SetArg};

use super::LineSettings;

/// The OS side of a serial line: a handle plus its line discipline.
///
/// [`SerialTransport`](super::SerialTransport) owns exactly one of these between a
/// successful open and close.
pub trait LineDevice {
    /// Open `path` for reading and writing without ever blocking.
    fn open(path: &str) -> io::Result<Self>
    where
        Self: Sized;

    fn read_settings(&self) -> io::Result<LineSettings>;

    /// Apply `settings` immediately.
    fn write_settings(&mut self, settings: &LineSettings) -> io::Result<()>;

    /// Discard unread input and unsent output.
    fn flush(&mut self) -> io::Result<()>;

    /// Non-blocking read; `WouldBlock` means nothing is buffered right now.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Non-blocking write; may accept fewer bytes than offered.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Release the handle, reporting any error from the OS.
    fn close(self) -> io::Result<()>
    where
        Self: Sized;
}

/// A tty device node driven through termios.
#[derive(Debug)]
pub struct TtyDevice {
    file: File,
}

impl LineDevice for TtyDevice {
    fn open(path: &str) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags((OFlag::O_NONBLOCK | OFlag::O_NOCTTY).bits())
            .open(path)?;
        Ok(Self { file })
    }

    fn read_settings(&self) -> io::Result<LineSettings> {
        let t = termios::tcgetattr(&self.file)?;
        Ok(LineSettings::from_termios(&t))
    }

    fn write_settings(&mut self, settings: &LineSettings) -> io::Result<()> {
        let mut t = termios::tcgetattr(&self.file)?;
        settings.write_to(&mut t)?;
        termios::tcsetattr(&self.file, SetArg::TCSANOW, &t)?;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        termios::tcflush(&self.file, FlushArg::TCIFLUSH)?;
        termios::tcflush(&self.file, FlushArg::TCOFLUSH)?;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn close(self) -> io::Result<()> {
        // Dropping a File swallows close(2) errors
        nix::unistd::close(self.file.into_raw_fd())?;
        Ok(())
    }
}
