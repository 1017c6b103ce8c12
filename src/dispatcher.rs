//! The listen-match-dispatch core.
//!
//! `TriggerDispatcher` owns the lifecycle of one listening session: it opens
//! the serial device, runs a worker thread that polls decoded lines, compares
//! each against the two configured trigger strings, and fires one UDP control
//! message per match. Every decoded line and every stream error is forwarded
//! to a registered observer, in read order.

use crate::error::BridgeError;
use crate::osc::{self, OscSender};
use crate::port::{PortAdapter, PortConfiguration, SyncSerialPort};
use crate::reader::PortReader;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Default bounded read timeout; also the upper bound on stop latency.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(200);

/// Runtime configuration for one listening session.
///
/// Copied into the session at start and immutable afterwards; changing any
/// value requires a restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    /// Serial device to open.
    pub port_name: String,
    /// Symbol rate for framing.
    pub baud_rate: u32,
    /// Exact-match line that connects `column_1`.
    pub trigger_1: String,
    /// Exact-match line that connects `column_2`.
    pub trigger_2: String,
    /// Column identifier substituted into the outgoing address on a
    /// `trigger_1` match.
    pub column_1: String,
    /// Column identifier substituted into the outgoing address on a
    /// `trigger_2` match.
    pub column_2: String,
    /// Bounded read timeout; the worker re-checks its stop signal at least
    /// this often.
    pub read_timeout: Duration,
    /// Destination endpoint for control messages.
    pub osc_target: SocketAddr,
}

impl ListenerConfig {
    /// Build a configuration with the default read timeout and control
    /// endpoint.
    pub fn new(
        port_name: impl Into<String>,
        baud_rate: u32,
        trigger_1: impl Into<String>,
        trigger_2: impl Into<String>,
        column_1: impl Into<String>,
        column_2: impl Into<String>,
    ) -> Self {
        Self {
            port_name: port_name.into(),
            baud_rate,
            trigger_1: trigger_1.into(),
            trigger_2: trigger_2.into(),
            column_1: column_1.into(),
            column_2: column_2.into(),
            read_timeout: DEFAULT_READ_TIMEOUT,
            osc_target: osc::default_target(),
        }
    }

    /// Validate preconditions before any I/O is attempted.
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.port_name.is_empty() {
            return Err(BridgeError::config("port name must not be empty"));
        }
        if self.baud_rate == 0 {
            return Err(BridgeError::config("baud rate must be a positive integer"));
        }
        Ok(())
    }
}

/// An event delivered to the observer, in the order lines were read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// A decoded line, matched or not.
    Line(String),
    /// A diagnostic for a failure at or below the session boundary.
    Error(String),
}

/// Observer callback. Invoked from the worker thread, at most once per line;
/// must be cheap, since it sits on the read path.
pub type Observer = Arc<dyn Fn(BridgeEvent) + Send + Sync>;

/// One open-device-plus-worker lifetime, from start to stop or fatal error.
struct Session {
    stop: Arc<AtomicBool>,
    worker: thread::JoinHandle<()>,
}

/// Bridges trigger lines on a serial port to UDP control messages.
///
/// At most one session is active at a time. Calling [`start`] while running
/// replaces the session: the previous worker is signaled, joined, and its
/// device handle released before the new session begins.
///
/// [`start`]: TriggerDispatcher::start
#[derive(Default)]
pub struct TriggerDispatcher {
    observer: Option<Observer>,
    session: Option<Session>,
}

impl TriggerDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the observer that receives every decoded line and error.
    ///
    /// Replaces any previously registered observer; takes effect for the next
    /// session.
    pub fn set_observer(&mut self, observer: impl Fn(BridgeEvent) + Send + Sync + 'static) {
        self.observer = Some(Arc::new(observer));
    }

    /// Open the configured serial device and start listening.
    ///
    /// Open failures are reported twice on purpose: as the returned error for
    /// the caller's control flow, and as an observer `Error` event for the
    /// caller's log surface. The session is not created in that case.
    pub fn start(&mut self, config: ListenerConfig) -> Result<(), BridgeError> {
        config.validate()?;

        // Any previous session must release its device handle before the new
        // open; restarting on the same port would otherwise hit a busy device.
        self.stop();

        let port_config = PortConfiguration {
            baud_rate: config.baud_rate,
            timeout: config.read_timeout,
        };
        let port = match SyncSerialPort::open(&config.port_name, port_config) {
            Ok(port) => port,
            Err(e) => {
                self.notify(BridgeEvent::Error(format!("Serial error: {e}")));
                return Err(BridgeError::Open(e));
            }
        };

        self.start_with_port(config, Box::new(port))
    }

    /// Start listening on an already-open port adapter.
    ///
    /// This is the injection seam used by tests; [`start`] delegates here
    /// after opening the real device.
    ///
    /// [`start`]: TriggerDispatcher::start
    pub fn start_with_port(
        &mut self,
        config: ListenerConfig,
        mut port: PortAdapter,
    ) -> Result<(), BridgeError> {
        config.validate()?;
        self.stop();

        if let Err(e) = port.set_timeout(config.read_timeout) {
            self.notify(BridgeEvent::Error(format!("Serial error: {e}")));
            return Err(BridgeError::Open(e));
        }

        let sender = match OscSender::connect(config.osc_target) {
            Ok(sender) => sender,
            Err(e) => {
                self.notify(BridgeEvent::Error(format!("Control socket error: {e}")));
                return Err(BridgeError::Socket(e));
            }
        };

        let reader = PortReader::new(port);
        let stop = Arc::new(AtomicBool::new(false));
        let observer = self.observer.clone();

        info!(
            port = %config.port_name,
            baud = config.baud_rate,
            target = %config.osc_target,
            "starting serial listener"
        );

        let flag = Arc::clone(&stop);
        let worker = thread::Builder::new()
            .name("serial-listener".to_string())
            .spawn(move || listen_loop(reader, sender, config, observer, flag))
            .map_err(BridgeError::Spawn)?;

        self.session = Some(Session { stop, worker });
        Ok(())
    }

    /// Signal the worker to stop and wait for it to exit.
    ///
    /// When this returns, the worker thread is gone and the serial handle is
    /// closed. The wait is bounded by the read timeout. No-op when no session
    /// is active; safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            session.stop.store(true, Ordering::SeqCst);
            if session.worker.join().is_err() {
                error!("listener thread panicked during shutdown");
            }
            info!("serial listener stopped");
        }
    }

    /// Whether a session is currently running.
    ///
    /// A worker that exited on its own (fatal stream error) reads as not
    /// running even before [`stop`] reaps it.
    ///
    /// [`stop`]: TriggerDispatcher::stop
    pub fn is_running(&self) -> bool {
        self.session
            .as_ref()
            .map(|s| !s.worker.is_finished())
            .unwrap_or(false)
    }

    fn notify(&self, event: BridgeEvent) {
        if let Some(observer) = &self.observer {
            observer(event);
        }
    }
}

impl Drop for TriggerDispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The worker loop: poll a line, forward it, dispatch on match, repeat until
/// stopped or the stream dies.
fn listen_loop(
    mut reader: PortReader,
    sender: OscSender,
    config: ListenerConfig,
    observer: Option<Observer>,
    stop: Arc<AtomicBool>,
) {
    let notify = |event: BridgeEvent| {
        if let Some(observer) = &observer {
            observer(event);
        }
    };

    while !stop.load(Ordering::SeqCst) {
        match reader.poll_line() {
            Ok(Some(line)) => {
                notify(BridgeEvent::Line(line.clone()));

                // First match wins; at most one dispatch per line even when
                // both triggers hold the same value.
                if line == config.trigger_1 {
                    dispatch(&sender, &config.column_1, &line);
                } else if line == config.trigger_2 {
                    dispatch(&sender, &config.column_2, &line);
                }
            }
            Ok(None) => {}
            Err(e) => {
                error!(port = reader.port_name(), error = %e, "serial stream failed");
                notify(BridgeEvent::Error(format!("Serial error: {e}")));
                break;
            }
        }
    }

    debug!(port = reader.port_name(), "listener loop exited");
}

fn dispatch(sender: &OscSender, column: &str, line: &str) {
    debug!(%line, column, "trigger matched");
    if let Err(e) = sender.send_connect(column) {
        // Fire-and-forget transport: a failed send is logged, never fatal.
        warn!(column, error = %e, "control message send failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ListenerConfig {
        ListenerConfig::new("TEST0", 9600, "LEFT", "RIGHT", "3", "7")
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_port() {
        let mut config = valid_config();
        config.port_name.clear();
        assert!(matches!(config.validate(), Err(BridgeError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_baud() {
        let mut config = valid_config();
        config.baud_rate = 0;
        assert!(matches!(config.validate(), Err(BridgeError::Config(_))));
    }

    #[test]
    fn test_start_rejects_invalid_config_before_io() {
        let mut dispatcher = TriggerDispatcher::new();
        let mut config = valid_config();
        config.port_name.clear();

        let result = dispatcher.start(config);
        assert!(matches!(result, Err(BridgeError::Config(_))));
        assert!(!dispatcher.is_running());
    }

    #[test]
    fn test_stop_without_session_is_a_noop() {
        let mut dispatcher = TriggerDispatcher::new();
        dispatcher.stop();
        dispatcher.stop();
        assert!(!dispatcher.is_running());
    }

    #[test]
    fn test_default_config_values() {
        let config = valid_config();
        assert_eq!(config.read_timeout, DEFAULT_READ_TIMEOUT);
        assert_eq!(config.osc_target, osc::default_target());
    }
}
