use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Result, SerialError};

/// Line speeds this transport knows how to program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BaudRate {
    B9600,
    B19200,
    B38400,
    B57600,
    B115200,
}

impl BaudRate {
    pub const ALL: [BaudRate; 5] = [
        BaudRate::B9600,
        BaudRate::B19200,
        BaudRate::B38400,
        BaudRate::B57600,
        BaudRate::B115200,
    ];

    pub fn as_u32(self) -> u32 {
        match self {
            BaudRate::B9600 => 9600,
            BaudRate::B19200 => 19200,
            BaudRate::B38400 => 38400,
            BaudRate::B57600 => 57600,
            BaudRate::B115200 => 115200,
        }
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = SerialError;

    fn try_from(value: u32) -> Result<Self> {
        BaudRate::ALL
            .into_iter()
            .find(|b| b.as_u32() == value)
            .ok_or_else(|| SerialError::InvalidConfig(format!("baud rate not supported: {}", value)))
    }
}

impl From<BaudRate> for u32 {
    fn from(baud: BaudRate) -> u32 {
        baud.as_u32()
    }
}

impl FromStr for BaudRate {
    type Err = SerialError;

    fn from_str(s: &str) -> Result<Self> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| SerialError::InvalidConfig(format!("baud rate not supported: {}", s)))?;
        BaudRate::try_from(value)
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// Parity setting for serial port configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    #[default]
    None,
    Odd,
    Even,
}

impl Parity {
    /// Single-character code used in frame strings such as `8N1`.
    pub fn code(self) -> char {
        match self {
            Parity::None => 'N',
            Parity::Odd => 'O',
            Parity::Even => 'E',
        }
    }
}

impl TryFrom<char> for Parity {
    type Error = SerialError;

    fn try_from(c: char) -> Result<Self> {
        match c {
            'N' => Ok(Parity::None),
            'O' => Ok(Parity::Odd),
            'E' => Ok(Parity::Even),
            other => Err(SerialError::InvalidConfig(format!("parity not supported: {}", other))),
        }
    }
}

/// Data bits, parity and stop bits, written as e.g. `8N1` or `7E2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameFormat {
    pub data_bits: u8,
    pub parity: Parity,
    pub two_stop_bits: bool,
}

impl Default for FrameFormat {
    fn default() -> Self {
        Self {
            data_bits: 8,
            parity: Parity::None,
            two_stop_bits: false,
        }
    }
}

impl FromStr for FrameFormat {
    type Err = SerialError;

    fn from_str(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 3 {
            return Err(SerialError::InvalidConfig(format!(
                "frame format must be <data bits><parity><stop bits>, e.g. 8N1: {}",
                s
            )));
        }

        let data_bits = match chars[0] {
            '7' => 7,
            '8' => 8,
            other => {
                return Err(SerialError::InvalidConfig(format!("data bits not supported: {}", other)))
            }
        };
        let parity = Parity::try_from(chars[1])?;
        let two_stop_bits = match chars[2] {
            '1' => false,
            '2' => true,
            other => {
                return Err(SerialError::InvalidConfig(format!("stop bits not supported: {}", other)))
            }
        };

        Ok(Self {
            data_bits,
            parity,
            two_stop_bits,
        })
    }
}

impl fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.data_bits,
            self.parity.code(),
            if self.two_stop_bits { 2 } else { 1 }
        )
    }
}

/// Everything needed to open and program one serial line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineConfig {
    pub path: String,
    pub baud_rate: BaudRate,
    pub parity: Parity,
    pub data_bits: u8,
    pub two_stop_bits: bool,
}

impl LineConfig {
    pub fn new(
        path: impl Into<String>,
        baud_rate: BaudRate,
        parity: Parity,
        data_bits: u8,
        two_stop_bits: bool,
    ) -> Self {
        Self {
            path: path.into(),
            baud_rate,
            parity,
            data_bits,
            two_stop_bits,
        }
    }

    pub fn with_frame(path: impl Into<String>, baud_rate: BaudRate, frame: FrameFormat) -> Self {
        Self::new(path, baud_rate, frame.parity, frame.data_bits, frame.two_stop_bits)
    }

    pub fn frame(&self) -> FrameFormat {
        FrameFormat {
            data_bits: self.data_bits,
            parity: self.parity,
            two_stop_bits: self.two_stop_bits,
        }
    }

    /// Reject values the line discipline cannot represent.
    pub fn validate(&self) -> Result<()> {
        if self.path.is_empty() {
            return Err(SerialError::InvalidConfig("device path is empty".to_string()));
        }
        if self.data_bits != 7 && self.data_bits != 8 {
            return Err(SerialError::InvalidConfig(format!(
                "data bits not supported: {}",
                self.data_bits
            )));
        }
        Ok(())
    }
}

impl fmt::Display for LineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.path, self.baud_rate, self.frame())
    }
}
