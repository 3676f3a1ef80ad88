pub mod cli;
pub mod echo;
pub mod logging;
pub mod serial;

pub use echo::{run_echo, EchoStats};
pub use serial::{BaudRate, LineConfig, Parity, SerialError, SerialTransport};
