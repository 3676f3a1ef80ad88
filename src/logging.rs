use std::io::Write;
use std::str::FromStr;

use log::{LevelFilter, Log, Metadata, Record};

/// Environment variable that overrides the level picked on the command line.
pub const LOG_ENV: &str = "SERIAL_LOOPBACK_LOG";

/// Timestamped stderr logger.
/// Prepends `HH:MM:SS.mmm` local time and the level to every record.
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(
            &chrono::Local::now().format("%H:%M:%S%.3f").to_string(),
            record,
        );
        let _ = writeln!(std::io::stderr().lock(), "{}", line);
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn format_record(timestamp: &str, record: &Record) -> String {
    format!("{} {:<5} {}", timestamp, record.level(), record.args())
}

/// Map `-q`/`-v` counts onto a level, `info` being the default.
pub fn level_from_verbosity(verbose: u8, quiet: u8) -> LevelFilter {
    match i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=-3 => LevelFilter::Off,
        -2 => LevelFilter::Error,
        -1 => LevelFilter::Warn,
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the stderr logger. `SERIAL_LOOPBACK_LOG` wins over `default_level`
/// when it holds a valid level name.
pub fn init(default_level: LevelFilter) -> Result<LevelFilter, log::SetLoggerError> {
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|v| LevelFilter::from_str(v.trim()).ok())
        .unwrap_or(default_level);
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(level)
}
