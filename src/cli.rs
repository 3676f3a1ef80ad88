use std::time::Duration;

use clap::{ArgAction, Parser};

use crate::serial::{BaudRate, FrameFormat, LineConfig};

pub const VERSION_BANNER: &str = concat!(
    ":::::::::::: TEST SERIAL PORT: v",
    env!("CARGO_PKG_VERSION"),
    " ::::::::::::"
);

/// Configure a serial port, print whatever it receives and send it back.
#[derive(Debug, Parser)]
#[command(
    name = "serial-loopback",
    version,
    disable_version_flag = true,
    after_help = "Example: serial-loopback /dev/ttyS0 9600 8N1"
)]
pub struct Cli {
    /// Path of the serial port
    #[arg(required_unless_present = "list")]
    pub port: Option<String>,

    /// Baud rate (9600, 19200, 38400, 57600, 115200)
    #[arg(required_unless_present = "list", value_parser = parse_baud)]
    pub baud: Option<BaudRate>,

    /// Data bits (7,8), parity (N,O,E) and stop bits (1,2), e.g. 8N1
    #[arg(required_unless_present = "list", value_parser = parse_frame)]
    pub frame: Option<FrameFormat>,

    /// List available serial ports and exit
    #[arg(long, conflicts_with_all = ["port", "baud", "frame"])]
    pub list: bool,

    /// Print the port list as JSON
    #[arg(long, requires = "list")]
    pub json: bool,

    /// Milliseconds to sleep between polls when no data is waiting
    #[arg(long, default_value_t = 10)]
    pub poll_ms: u64,

    /// More log output (repeatable)
    #[arg(long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Less log output (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    List { json: bool },
    Test(LineConfig),
}

impl Cli {
    pub fn mode(&self) -> Mode {
        match (&self.port, self.baud, self.frame) {
            (Some(port), Some(baud), Some(frame)) if !self.list => {
                Mode::Test(LineConfig::with_frame(port.clone(), baud, frame))
            }
            _ => Mode::List { json: self.json },
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }
}

fn parse_baud(s: &str) -> Result<BaudRate, String> {
    s.parse::<BaudRate>().map_err(|e| e.to_string())
}

fn parse_frame(s: &str) -> Result<FrameFormat, String> {
    s.parse::<FrameFormat>().map_err(|e| e.to_string())
}
