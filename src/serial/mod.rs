pub mod config;
pub mod device;
pub mod discipline;
pub mod discovery;
#[cfg(test)]
pub(crate) mod mock;
pub mod transport;

pub use config::{BaudRate, FrameFormat, LineConfig, Parity};
pub use device::{LineDevice, TtyDevice};
pub use discipline::LineSettings;
pub use discovery::{available_ports, SerialDeviceInfo};
pub use transport::{SerialTransport, TransportState};

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum SerialError {
    #[error("Invalid line configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to open {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read line configuration: {0}")]
    ConfigReadFailed(#[source] io::Error),

    #[error("Failed to apply line configuration: {0}")]
    ConfigWriteFailed(#[source] io::Error),

    #[error("Read failed: {0}")]
    ReadFailed(#[source] io::Error),

    #[error("Write failed: {0}")]
    WriteFailed(#[source] io::Error),

    #[error("Close failed: {0}")]
    CloseFailed(#[source] io::Error),

    #[error("Port is not open")]
    NotOpen,

    #[error("Port is already open")]
    AlreadyOpen,

    #[error("Port has been closed")]
    AlreadyClosed,

    #[error("Port discovery failed: {0}")]
    Discovery(#[from] serialport::Error),
}

pub type Result<T> = std::result::Result<T, SerialError>;
