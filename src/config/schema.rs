//! Configuration schema definitions.
//!
//! Defines the structure of the configuration file using serde. All sections
//! have defaults, so a missing file or a partial file is always usable.

use super::error::{ConfigError, ConfigResult};
use crate::dispatcher::ListenerConfig;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serial port configuration
    pub serial: SerialConfig,
    /// Trigger and column mapping
    pub triggers: TriggerConfig,
    /// Outbound control endpoint
    pub osc: OscConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Serial port configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device to listen on (e.g., "/dev/ttyUSB0" or "COM3")
    pub port: Option<String>,
    /// Baud rate for framing
    pub baud: u32,
    /// Bounded read timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud: 9600,
            timeout_ms: 200,
        }
    }
}

impl SerialConfig {
    /// Get the read timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Trigger strings and the columns they connect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Exact-match line that connects `column_1`
    pub trigger_1: String,
    /// Exact-match line that connects `column_2`
    pub trigger_2: String,
    /// Column identifier for the first trigger
    pub column_1: String,
    /// Column identifier for the second trigger
    pub column_2: String,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            trigger_1: String::new(),
            trigger_2: String::new(),
            column_1: "1".to_string(),
            column_2: "2".to_string(),
        }
    }
}

/// Outbound control endpoint section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OscConfig {
    /// Destination host
    pub host: String,
    /// Destination UDP port
    pub port: u16,
}

impl Default for OscConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: crate::osc::DEFAULT_TARGET_PORT,
        }
    }
}

impl OscConfig {
    /// Resolve the destination as a socket address.
    pub fn target(&self) -> ConfigResult<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ConfigError::validation("osc.host", "not a valid IP address"))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Assemble the flat runtime configuration handed to the dispatcher.
    ///
    /// Fails when no serial device is configured; everything else has a
    /// usable default.
    pub fn listener(&self) -> ConfigResult<ListenerConfig> {
        let port_name = self
            .serial
            .port
            .clone()
            .ok_or_else(|| ConfigError::MissingRequired("serial.port".to_string()))?;

        Ok(ListenerConfig {
            port_name,
            baud_rate: self.serial.baud,
            trigger_1: self.triggers.trigger_1.clone(),
            trigger_2: self.triggers.trigger_2.clone(),
            column_1: self.triggers.column_1.clone(),
            column_2: self.triggers.column_2.clone(),
            read_timeout: self.serial.timeout(),
            osc_target: self.osc.target()?,
        })
    }
}
