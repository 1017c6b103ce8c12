//! Mock serial port implementation for testing.
//!
//! Provides a `MockSerialPort` that simulates serial port behavior without
//! requiring actual hardware. Supports staged input, timeout simulation, and
//! mid-stream device loss.

use super::error::PortError;
use super::traits::SerialPortAdapter;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Inner state of the mock port, protected by a mutex for interior mutability.
#[derive(Debug)]
struct MockPortState {
    /// Queue of bytes to be returned by read operations.
    read_queue: VecDeque<u8>,
    /// When set, reads fail with `Disconnected` once the queue is drained.
    fail_when_drained: bool,
    /// Whether `clear_input` has been called.
    input_cleared: bool,
    /// Configured read timeout; empty reads sleep this long before expiring.
    timeout: Duration,
    /// Total number of read calls, for teardown assertions.
    read_calls: u64,
}

impl Default for MockPortState {
    fn default() -> Self {
        Self {
            read_queue: VecDeque::new(),
            fail_when_drained: false,
            input_cleared: false,
            timeout: Duration::from_millis(10),
            read_calls: 0,
        }
    }
}

/// Mock serial port implementation for testing.
///
/// This implementation allows you to:
/// - Stage bytes to be returned by read operations
/// - Simulate timed-out reads (an empty queue behaves like a quiet device)
/// - Simulate the device going away mid-stream
/// - Verify that the input buffer was cleared on session start
///
/// The mock is a cloneable handle over shared state, so a test can keep one
/// clone for inspection while the listener owns the other.
///
/// # Example
/// ```
/// use serial_osc_bridge::port::{MockSerialPort, SerialPortAdapter};
///
/// let mut port = MockSerialPort::new("MOCK0");
/// port.enqueue(b"Hello\n");
///
/// let mut buffer = [0u8; 16];
/// let n = port.read_bytes(&mut buffer).unwrap();
/// assert_eq!(&buffer[..n], b"Hello\n");
/// ```
#[derive(Clone)]
pub struct MockSerialPort {
    /// The port name/identifier.
    name: String,
    /// The internal state, shared between clones.
    state: Arc<Mutex<MockPortState>>,
}

impl MockSerialPort {
    /// Create a new mock serial port with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockPortState::default())),
        }
    }

    /// Enqueue bytes to be returned by subsequent read operations.
    pub fn enqueue(&self, data: &[u8]) {
        let mut state = self.state.lock();
        state.read_queue.extend(data);
    }

    /// Enqueue one newline-terminated line.
    pub fn enqueue_line(&self, line: &str) {
        let mut state = self.state.lock();
        state.read_queue.extend(line.as_bytes());
        state.read_queue.push_back(b'\n');
    }

    /// Simulate the device going away: once the queue is drained, reads fail
    /// with `PortError::Disconnected` instead of timing out.
    pub fn fail_when_drained(&self) {
        let mut state = self.state.lock();
        state.fail_when_drained = true;
    }

    /// Whether `clear_input` has been called on this port.
    pub fn was_input_cleared(&self) -> bool {
        let state = self.state.lock();
        state.input_cleared
    }

    /// Get the number of bytes still queued for reading.
    pub fn queued_bytes(&self) -> usize {
        let state = self.state.lock();
        state.read_queue.len()
    }

    /// Total number of read calls made against this port.
    pub fn read_calls(&self) -> u64 {
        let state = self.state.lock();
        state.read_calls
    }
}

impl SerialPortAdapter for MockSerialPort {
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let timeout;
        {
            let mut state = self.state.lock();
            state.read_calls += 1;

            if !state.read_queue.is_empty() {
                let mut bytes_read = 0;
                for byte in buffer.iter_mut() {
                    if let Some(queued_byte) = state.read_queue.pop_front() {
                        *byte = queued_byte;
                        bytes_read += 1;
                    } else {
                        break;
                    }
                }
                return Ok(bytes_read);
            }

            if state.fail_when_drained {
                return Err(PortError::disconnected(&self.name));
            }

            timeout = state.timeout;
        }

        // Emulate a quiet device: block for the timeout window, then expire.
        // The lock is released first so stagers are not held up.
        std::thread::sleep(timeout);
        Err(PortError::Io(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "read timed out",
        )))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<(), PortError> {
        let mut state = self.state.lock();
        state.timeout = timeout;
        Ok(())
    }

    fn clear_input(&mut self) -> Result<(), PortError> {
        // Recorded but non-destructive: tests stage input before the session
        // starts, and that staged input must survive the start-time clear.
        let mut state = self.state.lock();
        state.input_cleared = true;
        Ok(())
    }

    fn bytes_to_read(&self) -> Option<usize> {
        let state = self.state.lock();
        Some(state.read_queue.len())
    }
}

impl std::fmt::Debug for MockSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialPort")
            .field("name", &self.name)
            .field("queued_bytes", &self.queued_bytes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enqueue_and_read() {
        let mut port = MockSerialPort::new("MOCK0");
        port.enqueue(b"Hello");

        let mut buffer = [0u8; 10];
        let n = port.read_bytes(&mut buffer).unwrap();
        assert_eq!(n, 5);
        assert_eq!(&buffer[..n], b"Hello");
    }

    #[test]
    fn test_enqueue_line_appends_terminator() {
        let mut port = MockSerialPort::new("MOCK0");
        port.enqueue_line("LEFT");

        let mut buffer = [0u8; 10];
        let n = port.read_bytes(&mut buffer).unwrap();
        assert_eq!(&buffer[..n], b"LEFT\n");
    }

    #[test]
    fn test_empty_read_times_out() {
        let mut port = MockSerialPort::new("MOCK0");
        port.set_timeout(Duration::from_millis(1)).unwrap();

        let mut buffer = [0u8; 10];
        let result = port.read_bytes(&mut buffer);
        match result {
            Err(e) => assert!(e.is_poll_tick()),
            Ok(_) => panic!("Expected a timed-out read"),
        }
    }

    #[test]
    fn test_fail_when_drained() {
        let mut port = MockSerialPort::new("MOCK0");
        port.enqueue(b"x");
        port.fail_when_drained();

        let mut buffer = [0u8; 10];
        assert_eq!(port.read_bytes(&mut buffer).unwrap(), 1);

        let result = port.read_bytes(&mut buffer);
        assert!(matches!(result, Err(PortError::Disconnected(_))));
    }

    #[test]
    fn test_partial_read() {
        let mut port = MockSerialPort::new("MOCK0");
        port.enqueue(b"Hello, World!");

        let mut buffer = [0u8; 5];
        let n = port.read_bytes(&mut buffer).unwrap();
        assert_eq!(n, 5);
        assert_eq!(&buffer[..n], b"Hello");
        assert_eq!(port.queued_bytes(), 8);
    }

    #[test]
    fn test_clear_input_is_recorded_but_preserves_staged_bytes() {
        let mut port = MockSerialPort::new("MOCK0");
        port.enqueue(b"staged");

        port.clear_input().unwrap();
        assert!(port.was_input_cleared());
        assert_eq!(port.queued_bytes(), 6);
    }

    #[test]
    fn test_read_calls_counted() {
        let mut port = MockSerialPort::new("MOCK0");
        port.set_timeout(Duration::from_millis(1)).unwrap();
        port.enqueue(b"a");

        let mut buffer = [0u8; 4];
        let _ = port.read_bytes(&mut buffer);
        let _ = port.read_bytes(&mut buffer);
        assert_eq!(port.read_calls(), 2);
    }

    #[test]
    fn test_clone_shares_state() {
        let port = MockSerialPort::new("MOCK0");
        let mut clone = port.clone();
        port.enqueue(b"shared");

        let mut buffer = [0u8; 6];
        let n = clone.read_bytes(&mut buffer).unwrap();
        assert_eq!(&buffer[..n], b"shared");
        assert_eq!(port.queued_bytes(), 0);
    }
}
