//! Lazy line source over an open serial port.
//!
//! `PortReader` turns byte-level reads into a pull-based sequence of decoded
//! lines. The sequence is infinite: it only ends when the caller stops
//! polling or the device fails. A reader that has returned an error is dead;
//! reading again requires opening a new port.

use crate::framing::LineBuffer;
use crate::port::{PortAdapter, PortError};
use std::collections::VecDeque;
use tracing::trace;

const READ_CHUNK_SIZE: usize = 512;

/// Pull-based line reader over a serial port adapter.
pub struct PortReader {
    port: PortAdapter,
    framer: LineBuffer,
    /// Lines decoded but not yet handed out; a single read can complete
    /// several lines and each poll yields exactly one.
    ready: VecDeque<String>,
}

impl PortReader {
    /// Wrap an open port, discarding any input that predates the session.
    pub fn new(mut port: PortAdapter) -> Self {
        if let Err(e) = port.clear_input() {
            trace!(port = port.name(), error = %e, "could not clear stale input");
        }
        Self {
            port,
            framer: LineBuffer::new(),
            ready: VecDeque::new(),
        }
    }

    /// Poll for the next decoded line.
    ///
    /// Returns:
    /// - `Ok(Some(line))` when a complete line is available,
    /// - `Ok(None)` when the bounded read expired without completing one
    ///   (the caller's chance to check its stop signal),
    /// - `Err(_)` on an unrecoverable stream error; the reader is finished.
    pub fn poll_line(&mut self) -> Result<Option<String>, PortError> {
        if let Some(line) = self.ready.pop_front() {
            return Ok(Some(line));
        }

        let mut chunk = [0u8; READ_CHUNK_SIZE];
        match self.port.read_bytes(&mut chunk) {
            Ok(0) => Ok(None),
            Ok(n) => {
                trace!(port = self.port.name(), bytes = n, "read");
                self.ready.extend(self.framer.push(&chunk[..n]));
                Ok(self.ready.pop_front())
            }
            Err(e) if e.is_poll_tick() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// The name of the underlying device.
    pub fn port_name(&self) -> &str {
        self.port.name()
    }
}

impl std::fmt::Debug for PortReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortReader")
            .field("port", &self.port.name())
            .field("ready_lines", &self.ready.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{MockSerialPort, SerialPortAdapter};
    use std::time::Duration;

    fn reader_over(port: &MockSerialPort) -> PortReader {
        let mut handle = port.clone();
        handle.set_timeout(Duration::from_millis(1)).unwrap();
        PortReader::new(Box::new(handle))
    }

    #[test]
    fn test_poll_yields_lines_in_order() {
        let port = MockSerialPort::new("MOCK0");
        port.enqueue(b"first\nsecond\n");

        let mut reader = reader_over(&port);
        assert_eq!(reader.poll_line().unwrap(), Some("first".to_string()));
        assert_eq!(reader.poll_line().unwrap(), Some("second".to_string()));
        assert_eq!(reader.poll_line().unwrap(), None);
    }

    #[test]
    fn test_partial_line_completes_across_polls() {
        let port = MockSerialPort::new("MOCK0");
        port.enqueue(b"hal");

        let mut reader = reader_over(&port);
        assert_eq!(reader.poll_line().unwrap(), None);

        port.enqueue(b"f\n");
        assert_eq!(reader.poll_line().unwrap(), Some("half".to_string()));
    }

    #[test]
    fn test_quiet_device_is_a_tick_not_an_error() {
        let port = MockSerialPort::new("MOCK0");
        let mut reader = reader_over(&port);
        assert_eq!(reader.poll_line().unwrap(), None);
        assert_eq!(reader.poll_line().unwrap(), None);
    }

    #[test]
    fn test_stream_error_is_fatal() {
        let port = MockSerialPort::new("MOCK0");
        port.enqueue(b"last\n");
        port.fail_when_drained();

        let mut reader = reader_over(&port);
        assert_eq!(reader.poll_line().unwrap(), Some("last".to_string()));
        assert!(matches!(
            reader.poll_line(),
            Err(PortError::Disconnected(_))
        ));
    }

    #[test]
    fn test_input_cleared_on_construction() {
        let port = MockSerialPort::new("MOCK0");
        let _reader = reader_over(&port);
        assert!(port.was_input_cleared());
    }
}
