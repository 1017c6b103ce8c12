//! Configuration module for serial-osc-bridge.
//!
//! This module provides TOML-based configuration with environment variable
//! overrides.
//!
//! # Configuration Resolution
//!
//! Configuration is loaded from the following locations (in order of priority):
//!
//! 1. `SERIAL_OSC_BRIDGE_CONFIG` environment variable (explicit path)
//! 2. `./config.toml` (current directory)
//! 3. `~/.config/serial-osc-bridge/config.toml` (XDG on Linux/macOS)
//! 4. `%APPDATA%\serial-osc-bridge\config.toml` (Windows)
//! 5. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! Scalar values can be overridden via environment variables with the
//! `SERIAL_OSC_BRIDGE_<SECTION>_<KEY>` pattern, e.g.:
//! - `SERIAL_OSC_BRIDGE_SERIAL_PORT=/dev/ttyACM0`
//! - `SERIAL_OSC_BRIDGE_SERIAL_BAUD=115200`
//! - `SERIAL_OSC_BRIDGE_OSC_PORT=9000`

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{resolve_config_path, ConfigLoader};
pub use schema::{Config, LoggingConfig, OscConfig, SerialConfig, TriggerConfig};
