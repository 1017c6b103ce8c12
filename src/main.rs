use clap::Parser;
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use serial_osc_bridge::config::ConfigLoader;
use serial_osc_bridge::dispatcher::{BridgeEvent, TriggerDispatcher};
use serial_osc_bridge::port;

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Bridges a line-oriented serial device to OSC column-select messages over UDP.",
    long_about = "Listens on a serial port for newline-terminated text lines. When a line \
exactly matches one of two configured trigger strings, sends a column-connect control \
message to a local UDP endpoint. All received lines are logged."
)]
struct Args {
    /// Serial device to listen on (overrides the config file).
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate (overrides the config file).
    #[arg(short, long)]
    baud: Option<u32>,

    /// Exact-match line that connects the first column.
    #[arg(long)]
    trigger_1: Option<String>,

    /// Exact-match line that connects the second column.
    #[arg(long)]
    trigger_2: Option<String>,

    /// Column identifier for the first trigger.
    #[arg(long)]
    column_1: Option<String>,

    /// Column identifier for the second trigger.
    #[arg(long)]
    column_2: Option<String>,

    /// Explicit configuration file path.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List available serial devices and exit.
    #[arg(long)]
    list_ports: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let loader = match &args.config {
        Some(path) => ConfigLoader::load_from(path)?,
        None => ConfigLoader::load()?,
    };
    let mut config = loader.into_config();

    init_tracing(&config.logging.level);

    if args.list_ports {
        for name in port::available_port_names()? {
            println!("{name}");
        }
        return Ok(());
    }

    // CLI flags win over the config file.
    if let Some(port) = args.port {
        config.serial.port = Some(port);
    }
    if let Some(baud) = args.baud {
        config.serial.baud = baud;
    }
    if let Some(trigger) = args.trigger_1 {
        config.triggers.trigger_1 = trigger;
    }
    if let Some(trigger) = args.trigger_2 {
        config.triggers.trigger_2 = trigger;
    }
    if let Some(column) = args.column_1 {
        config.triggers.column_1 = column;
    }
    if let Some(column) = args.column_2 {
        config.triggers.column_2 = column;
    }

    let listener = config.listener()?;
    let port_name = listener.port_name.clone();
    let baud = listener.baud_rate;

    let mut dispatcher = TriggerDispatcher::new();
    dispatcher.set_observer(|event| match event {
        BridgeEvent::Line(line) => info!(%line, "rx"),
        BridgeEvent::Error(message) => error!(%message, "listener error"),
    });

    dispatcher.start(listener)?;
    info!(port = %port_name, baud, "listening; press Ctrl+C to stop");

    shutdown_signal().await;

    dispatcher.stop();
    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

// --- Graceful Shutdown Handler ---
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("signal received, shutting down");
}
