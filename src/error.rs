//! Unified application error type.

use crate::port::PortError;
use thiserror::Error;

/// Errors surfaced to the caller by the dispatcher's control surface.
///
/// Failures below the session boundary (mid-stream I/O errors) are not
/// represented here; they reach the caller as observer events instead, and
/// the dispatcher stays restartable after any of them.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The supplied configuration failed validation before any I/O.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The serial device could not be opened.
    #[error("Failed to open serial device: {0}")]
    Open(#[from] PortError),

    /// The outbound control socket could not be set up.
    #[error("Failed to set up control socket: {0}")]
    Socket(std::io::Error),

    /// The listener thread could not be spawned.
    #[error("Failed to spawn listener thread: {0}")]
    Spawn(std::io::Error),
}

impl BridgeError {
    /// Create a Config error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BridgeError::config("port name must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: port name must not be empty"
        );

        let err = BridgeError::Open(PortError::not_found("COM9"));
        assert_eq!(
            err.to_string(),
            "Failed to open serial device: Serial port not found: COM9"
        );
    }
}
