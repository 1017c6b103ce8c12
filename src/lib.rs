//! Serial OSC Bridge Library
//!
//! Watches a serial port for newline-terminated text lines and, when a line
//! exactly matches one of two configured trigger strings, sends an OSC-style
//! column-connect message over UDP to a local control endpoint.
//!
//! # Modules
//!
//! - `config`: Configuration management with TOML support
//! - `dispatcher`: The listen-match-dispatch core and its start/stop lifecycle
//! - `error`: Unified error handling
//! - `framing`: Line framing and lossless text decoding
//! - `osc`: OSC message encoding and the UDP control client
//! - `port`: Port abstraction layer for serial input
//! - `reader`: Lazy line source over an open port

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod framing;
pub mod osc;
pub mod port;
pub mod reader;

// Re-export commonly used types for convenience
pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
pub use dispatcher::{BridgeEvent, ListenerConfig, Observer, TriggerDispatcher};
pub use error::BridgeError;
pub use osc::OscSender;
pub use port::{
    available_port_names, MockSerialPort, PortConfiguration, PortError, SerialPortAdapter,
    SyncSerialPort,
};
pub use reader::PortReader;
