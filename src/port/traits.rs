//! Core traits for serial port abstraction.
//!
//! Defines the `SerialPortAdapter` trait that allows both real serial ports
//! and mock implementations to be used interchangeably by the read loop.

use super::error::PortError;
use std::time::Duration;

/// Configuration parameters for opening a serial port.
///
/// The wire format is fixed line-oriented 8N1 text, so only the symbol rate
/// and the read timeout are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortConfiguration {
    /// Baud rate (bits per second).
    pub baud_rate: u32,

    /// Bounded read timeout. Keeps blocking reads short enough that a stop
    /// request is observed within one timeout interval.
    pub timeout: Duration,
}

impl Default for PortConfiguration {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            timeout: Duration::from_millis(200),
        }
    }
}

/// Trait for serial port input operations.
///
/// This trait abstracts over synchronous serial reads, allowing both real
/// hardware ports and mock implementations for testing. The bridge only ever
/// listens; there is no write surface.
pub trait SerialPortAdapter: Send + std::fmt::Debug {
    /// Read bytes from the serial port into the provided buffer.
    ///
    /// Returns the number of bytes actually read. A read that expires without
    /// data fails with a `TimedOut`-kind I/O error (see
    /// [`PortError::is_poll_tick`]).
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError>;

    /// Get the name/path of this serial port.
    fn name(&self) -> &str;

    /// Set the read timeout for this port.
    fn set_timeout(&mut self, timeout: Duration) -> Result<(), PortError>;

    /// Discard any bytes that arrived before the listener started.
    fn clear_input(&mut self) -> Result<(), PortError>;

    /// Get the current bytes available to read (if supported).
    ///
    /// Returns `None` if the operation is not supported or cannot be determined.
    fn bytes_to_read(&self) -> Option<usize> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration() {
        let config = PortConfiguration::default();
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.timeout, Duration::from_millis(200));
    }
}
