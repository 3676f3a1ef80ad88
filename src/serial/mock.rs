//! In-memory [`LineDevice`] for exercising the transport without a tty.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use super::discipline::tests::cooked;
use super::{LineDevice, LineSettings};

#[derive(Default)]
pub(crate) struct Shared {
    pub(crate) settings: Option<LineSettings>,
    pub(crate) applied: Vec<LineSettings>,
    pub(crate) flushed: usize,
    pub(crate) incoming: VecDeque<io::Result<Vec<u8>>>,
    pub(crate) written: Vec<u8>,
    pub(crate) write_limit: Option<usize>,
    pub(crate) fail_get: bool,
    pub(crate) fail_set: bool,
    pub(crate) fail_write: bool,
    pub(crate) fail_close: bool,
    pub(crate) closed: usize,
}

pub(crate) struct MockDevice(pub(crate) Rc<RefCell<Shared>>);

pub(crate) fn mock() -> (MockDevice, Rc<RefCell<Shared>>) {
    let shared = Rc::new(RefCell::new(Shared {
        settings: Some(cooked()),
        ..Default::default()
    }));
    (MockDevice(shared.clone()), shared)
}

impl LineDevice for MockDevice {
    fn open(path: &str) -> io::Result<Self> {
        Err(io::Error::new(io::ErrorKind::NotFound, path.to_string()))
    }

    fn read_settings(&self) -> io::Result<LineSettings> {
        let s = self.0.borrow();
        if s.fail_get {
            return Err(io::Error::from_raw_os_error(25));
        }
        Ok(s.settings.unwrap_or_else(cooked))
    }

    fn write_settings(&mut self, settings: &LineSettings) -> io::Result<()> {
        let mut s = self.0.borrow_mut();
        if s.fail_set {
            return Err(io::Error::from_raw_os_error(22));
        }
        s.settings = Some(*settings);
        s.applied.push(*settings);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut s = self.0.borrow_mut();
        assert!(s.applied.is_empty(), "flush must precede applying settings");
        s.flushed += 1;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.0.borrow_mut().incoming.pop_front() {
            None => Err(io::ErrorKind::WouldBlock.into()),
            Some(Err(e)) => Err(e),
            Some(Ok(bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                Ok(n)
            }
        }
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut s = self.0.borrow_mut();
        if s.fail_write {
            return Err(io::Error::from_raw_os_error(5));
        }
        let n = s.write_limit.map_or(buf.len(), |limit| limit.min(buf.len()));
        s.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn close(self) -> io::Result<()> {
        let mut s = self.0.borrow_mut();
        s.closed += 1;
        if s.fail_close {
            return Err(io::Error::from_raw_os_error(9));
        }
        Ok(())
    }
}
