//! Kept in its own test binary so no other test opens descriptors concurrently.

use serial_loopback_lib::serial::{BaudRate, LineConfig, Parity, SerialError, SerialTransport, TransportState};

fn open_fd_count() -> usize {
    std::fs::read_dir("/proc/self/fd").map(|d| d.count()).unwrap_or(0)
}

#[test]
fn failed_opens_release_every_descriptor() {
    let before = open_fd_count();

    let mut port: SerialTransport = SerialTransport::new();
    let missing = LineConfig::new("/dev/does-not-exist-tty", BaudRate::B9600, Parity::None, 8, false);
    match port.open(&missing) {
        Err(SerialError::OpenFailed { path, source }) => {
            assert_eq!(path, "/dev/does-not-exist-tty");
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected OpenFailed, got {:?}", other),
    }
    assert_eq!(port.state(), TransportState::Idle);
    assert_eq!(open_fd_count(), before);

    // Opens fine but is not a terminal, so reading the line settings fails
    let not_a_tty = LineConfig::new("/dev/null", BaudRate::B9600, Parity::None, 8, false);
    assert!(matches!(port.open(&not_a_tty), Err(SerialError::ConfigReadFailed(_))));
    assert_eq!(port.state(), TransportState::Idle);
    assert_eq!(open_fd_count(), before);

    assert!(matches!(port.close(), Err(SerialError::NotOpen)));
}
