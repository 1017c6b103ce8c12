//! Port abstraction layer for serial communication.
//!
//! Provides traits and implementations for synchronous serial input,
//! enabling dependency injection and testing via mocks.

pub mod error;
pub mod mock;
pub mod sync_port;
pub mod traits;

pub use error::PortError;
pub use mock::MockSerialPort;
pub use sync_port::SyncSerialPort;
pub use traits::{PortConfiguration, SerialPortAdapter};

/// Type alias for the boxed adapter handed to the read loop.
pub type PortAdapter = Box<dyn SerialPortAdapter>;

/// List the serial devices currently available on this host.
///
/// Pass-through to the platform's serial enumeration, returning just the
/// device identifiers (e.g., "/dev/ttyUSB0", "COM3") for use in a selection
/// control.
pub fn available_port_names() -> Result<Vec<String>, PortError> {
    let ports = serialport::available_ports()?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}
