//! Translation of a [`LineConfig`] into termios line-discipline state.
//!
//! [`LineSettings`] mirrors only the termios fields this crate programs, so the
//! mapping can be exercised without a terminal device behind it.

use nix::sys::termios::{
    self, BaudRate as OsBaudRate, ControlFlags, InputFlags, LocalFlags, OutputFlags,
    SpecialCharacterIndices, Termios,
};

use super::{BaudRate, LineConfig, Parity, Result, SerialError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSettings {
    pub input_flags: InputFlags,
    pub output_flags: OutputFlags,
    pub control_flags: ControlFlags,
    pub local_flags: LocalFlags,
    pub input_speed: OsBaudRate,
    pub output_speed: OsBaudRate,
    /// VMIN
    pub min_chars: u8,
    /// VTIME, in tenths of a second
    pub timeout_ds: u8,
}

pub fn os_speed(baud: BaudRate) -> OsBaudRate {
    match baud {
        BaudRate::B9600 => OsBaudRate::B9600,
        BaudRate::B19200 => OsBaudRate::B19200,
        BaudRate::B38400 => OsBaudRate::B38400,
        BaudRate::B57600 => OsBaudRate::B57600,
        BaudRate::B115200 => OsBaudRate::B115200,
    }
}

impl LineSettings {
    pub fn from_termios(t: &Termios) -> Self {
        Self {
            input_flags: t.input_flags,
            output_flags: t.output_flags,
            control_flags: t.control_flags,
            local_flags: t.local_flags,
            input_speed: termios::cfgetispeed(t),
            output_speed: termios::cfgetospeed(t),
            min_chars: t.control_chars[SpecialCharacterIndices::VMIN as usize],
            timeout_ds: t.control_chars[SpecialCharacterIndices::VTIME as usize],
        }
    }

    /// Copy these settings into `t`, leaving fields this crate does not manage untouched.
    pub fn write_to(&self, t: &mut Termios) -> nix::Result<()> {
        t.input_flags = self.input_flags;
        t.output_flags = self.output_flags;
        t.control_flags = self.control_flags;
        t.local_flags = self.local_flags;
        termios::cfsetispeed(t, self.input_speed)?;
        termios::cfsetospeed(t, self.output_speed)?;
        t.control_chars[SpecialCharacterIndices::VMIN as usize] = self.min_chars;
        t.control_chars[SpecialCharacterIndices::VTIME as usize] = self.timeout_ds;
        Ok(())
    }

    /// Program a raw, non-blocking line for `config`.
    ///
    /// Fails with [`SerialError::InvalidConfig`] before touching any field when the
    /// configuration cannot be represented.
    pub fn apply(&mut self, config: &LineConfig) -> Result<()> {
        let char_size = match config.data_bits {
            7 => ControlFlags::CS7,
            8 => ControlFlags::CS8,
            other => {
                return Err(SerialError::InvalidConfig(format!("data bits not supported: {}", other)))
            }
        };

        let speed = os_speed(config.baud_rate);
        self.input_speed = speed;
        self.output_speed = speed;

        // Receiver on, ignore modem control lines
        self.control_flags |= ControlFlags::CLOCAL | ControlFlags::CREAD;

        self.control_flags.set(ControlFlags::CSTOPB, config.two_stop_bits);

        match config.parity {
            Parity::None => self.control_flags.remove(ControlFlags::PARENB),
            Parity::Odd => self.control_flags |= ControlFlags::PARENB | ControlFlags::PARODD,
            Parity::Even => {
                self.control_flags.insert(ControlFlags::PARENB);
                self.control_flags.remove(ControlFlags::PARODD);
            }
        }

        self.control_flags.remove(ControlFlags::CSIZE);
        self.control_flags.insert(char_size);

        self.control_flags.remove(ControlFlags::CRTSCTS);

        self.input_flags = if config.parity == Parity::None {
            InputFlags::empty()
        } else {
            InputFlags::INPCK | InputFlags::ISTRIP
        };

        self.output_flags = OutputFlags::empty();
        self.local_flags = LocalFlags::empty();

        // Return immediately with whatever is buffered
        self.min_chars = 0;
        self.timeout_ds = 0;

        Ok(())
    }

    pub fn data_bits(&self) -> Option<u8> {
        match self.control_flags & ControlFlags::CSIZE {
            f if f == ControlFlags::CS5 => Some(5),
            f if f == ControlFlags::CS6 => Some(6),
            f if f == ControlFlags::CS7 => Some(7),
            f if f == ControlFlags::CS8 => Some(8),
            _ => None,
        }
    }

    pub fn parity(&self) -> Parity {
        if !self.control_flags.contains(ControlFlags::PARENB) {
            Parity::None
        } else if self.control_flags.contains(ControlFlags::PARODD) {
            Parity::Odd
        } else {
            Parity::Even
        }
    }

    pub fn two_stop_bits(&self) -> bool {
        self.control_flags.contains(ControlFlags::CSTOPB)
    }

    /// No canonical input, echo, signal characters or output post-processing,
    /// and reads that never wait.
    pub fn is_raw(&self) -> bool {
        self.local_flags.is_empty()
            && self.output_flags.is_empty()
            && self.min_chars == 0
            && self.timeout_ds == 0
    }
}
