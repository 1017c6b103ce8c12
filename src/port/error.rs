//! Port-specific error types.
//!
//! Defines error types for serial port operations, separate from application-level
//! errors so the listener loop can distinguish poll ticks from real failures.

use thiserror::Error;

/// Errors that can occur during serial port operations.
#[derive(Debug, Error)]
pub enum PortError {
    /// The specified serial port was not found on the system.
    #[error("Serial port not found: {0}")]
    NotFound(String),

    /// An I/O error occurred during port operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Port configuration failed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The device went away while the port was open.
    #[error("Device disconnected: {0}")]
    Disconnected(String),

    /// A serialport-specific error occurred.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl PortError {
    /// Create a NotFound error from a port name.
    pub fn not_found(port_name: impl Into<String>) -> Self {
        Self::NotFound(port_name.into())
    }

    /// Create a Config error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a Disconnected error from a port name.
    pub fn disconnected(port_name: impl Into<String>) -> Self {
        Self::Disconnected(port_name.into())
    }

    /// Whether this error is an expected timed-read expiry rather than a failure.
    ///
    /// Bounded reads surface `TimedOut` (or `WouldBlock` on some platforms) when
    /// no data arrived inside the timeout window; the read loop treats those as
    /// poll ticks and keeps going.
    pub fn is_poll_tick(&self) -> bool {
        match self {
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::WouldBlock
                    | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PortError::not_found("/dev/ttyUSB0");
        assert_eq!(err.to_string(), "Serial port not found: /dev/ttyUSB0");

        let err = PortError::config("Invalid baud rate");
        assert_eq!(err.to_string(), "Configuration error: Invalid baud rate");

        let err = PortError::disconnected("COM3");
        assert_eq!(err.to_string(), "Device disconnected: COM3");
    }

    #[test]
    fn test_timeout_is_poll_tick() {
        let err = PortError::Io(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "read timed out",
        ));
        assert!(err.is_poll_tick());

        let err = PortError::Io(std::io::Error::new(
            std::io::ErrorKind::WouldBlock,
            "no data available",
        ));
        assert!(err.is_poll_tick());
    }

    #[test]
    fn test_hard_errors_are_not_poll_ticks() {
        let err = PortError::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "device gone",
        ));
        assert!(!err.is_poll_tick());

        assert!(!PortError::not_found("COM9").is_poll_tick());
        assert!(!PortError::disconnected("COM9").is_poll_tick());
    }
}
