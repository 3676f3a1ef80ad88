use std::io;

use super::{LineConfig, LineDevice, LineSettings, Result, SerialError, TtyDevice};

/// Where a transport is in its open → closed lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Idle,
    Open,
    Closed,
}

enum Slot<D> {
    Idle,
    Open { device: D, config: LineConfig },
    Closed { config: LineConfig },
}

/// A single configured serial line.
///
/// The transport owns at most one device handle. Reads and writes never block;
/// a read with nothing buffered returns `Ok(0)`.
pub struct SerialTransport<D: LineDevice = TtyDevice> {
    slot: Slot<D>,
}

impl<D: LineDevice> SerialTransport<D> {
    pub fn new() -> Self {
        Self { slot: Slot::Idle }
    }

    /// Open `config.path` and program the line.
    ///
    /// The configuration is validated before the device is touched. If anything
    /// fails after the handle was acquired, the handle is released again and the
    /// transport stays idle.
    pub fn open(&mut self, config: &LineConfig) -> Result<()> {
        self.ensure_idle()?;
        config.validate()?;

        let device = D::open(&config.path).map_err(|source| SerialError::OpenFailed {
            path: config.path.clone(),
            source,
        })?;
        log::debug!("Opened {}", config.path);

        self.attach(device, config)
    }

    /// Program an already opened device and take ownership of it.
    pub fn attach(&mut self, mut device: D, config: &LineConfig) -> Result<()> {
        let result = self
            .ensure_idle()
            .and_then(|_| config.validate())
            .and_then(|_| configure(&mut device, config));
        if let Err(e) = result {
            if let Err(close_err) = device.close() {
                log::debug!("Releasing {} after failed open: {}", config.path, close_err);
            }
            return Err(e);
        }

        log::debug!("Configured {}", config);
        self.slot = Slot::Open {
            device,
            config: config.clone(),
        };
        Ok(())
    }

    /// Read whatever is buffered, up to `buf.len()` bytes.
    pub fn read_available(&mut self, buf: &mut [u8]) -> Result<usize> {
        let device = self.device_mut()?;
        match device.read(buf) {
            Ok(n) => Ok(n),
            Err(e) if is_no_data(&e) => Ok(0),
            Err(e) => Err(SerialError::ReadFailed(e)),
        }
    }

    /// Offer `buf` to the line and return how many bytes were accepted.
    ///
    /// A short count is not an error; sending the remainder is up to the caller.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let device = self.device_mut()?;
        match device.write(buf) {
            Ok(n) => Ok(n),
            Err(e) if is_no_data(&e) => Ok(0),
            Err(e) => Err(SerialError::WriteFailed(e)),
        }
    }

    /// Release the device handle. The transport cannot be reopened afterwards.
    pub fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.slot, Slot::Idle) {
            Slot::Idle => Err(SerialError::NotOpen),
            Slot::Closed { config } => {
                self.slot = Slot::Closed { config };
                Err(SerialError::AlreadyClosed)
            }
            Slot::Open { device, config } => {
                let path = config.path.clone();
                self.slot = Slot::Closed { config };
                device.close().map_err(SerialError::CloseFailed)?;
                log::debug!("Closed {}", path);
                Ok(())
            }
        }
    }

    /// Current line-discipline state as reported by the OS.
    pub fn line_settings(&self) -> Result<LineSettings> {
        match &self.slot {
            Slot::Open { device, .. } => device.read_settings().map_err(SerialError::ConfigReadFailed),
            Slot::Idle => Err(SerialError::NotOpen),
            Slot::Closed { .. } => Err(SerialError::AlreadyClosed),
        }
    }

    /// The configuration the transport was opened with, kept after close.
    pub fn config(&self) -> Option<&LineConfig> {
        match &self.slot {
            Slot::Idle => None,
            Slot::Open { config, .. } | Slot::Closed { config } => Some(config),
        }
    }

    pub fn state(&self) -> TransportState {
        match self.slot {
            Slot::Idle => TransportState::Idle,
            Slot::Open { .. } => TransportState::Open,
            Slot::Closed { .. } => TransportState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == TransportState::Open
    }

    fn ensure_idle(&self) -> Result<()> {
        match self.slot {
            Slot::Idle => Ok(()),
            Slot::Open { .. } => Err(SerialError::AlreadyOpen),
            Slot::Closed { .. } => Err(SerialError::AlreadyClosed),
        }
    }

    fn device_mut(&mut self) -> Result<&mut D> {
        match &mut self.slot {
            Slot::Open { device, .. } => Ok(device),
            Slot::Idle => Err(SerialError::NotOpen),
            Slot::Closed { .. } => Err(SerialError::AlreadyClosed),
        }
    }
}

impl<D: LineDevice> Default for SerialTransport<D> {
    fn default() -> Self {
        Self::new()
    }
}

fn configure<D: LineDevice>(device: &mut D, config: &LineConfig) -> Result<()> {
    let mut settings = device.read_settings().map_err(SerialError::ConfigReadFailed)?;
    settings.apply(config)?;
    device.flush().map_err(SerialError::ConfigWriteFailed)?;
    device
        .write_settings(&settings)
        .map_err(SerialError::ConfigWriteFailed)
}

fn is_no_data(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted)
}
