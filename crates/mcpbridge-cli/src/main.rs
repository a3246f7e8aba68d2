//! mcpbridge - expose a structured plugin backend as an MCP server on stdio.
//!
//! Reads newline-delimited JSON-RPC requests from stdin, forwards capability
//! calls to the backend over TCP, and writes one response line per request
//! to stdout. Logs go to stderr.

#![forbid(unsafe_code)]

mod config;
mod logging;

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};
use mcpbridge_backend::TcpSender;
use mcpbridge_core::CancellationToken;
use mcpbridge_core::logging::targets;
use mcpbridge_server::{Bridge, StopReason};
use mcpbridge_transport::TransportError;
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

use crate::config::{Config, ConfigError, FileConfig, Overrides};
use crate::logging::StderrLogger;

/// Bridge MCP clients on stdio to a plugin backend.
#[derive(Debug, Parser)]
#[command(name = "mcpbridge")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Backend address (host:port).
    #[arg(long, env = "MCPBRIDGE_BACKEND_ADDR", value_name = "HOST:PORT")]
    backend_addr: Option<String>,

    /// Config file (default: <config dir>/mcpbridge/config.toml).
    #[arg(long, short = 'c', env = "MCPBRIDGE_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seconds to wait for the backend connection (0 waits forever).
    #[arg(long, value_name = "SECS")]
    connect_timeout: Option<u64>,

    /// Seconds to wait for each backend reply (0 waits forever).
    #[arg(long, value_name = "SECS")]
    request_timeout: Option<u64>,

    /// Log level (off, error, warn, info, debug, trace).
    #[arg(long, env = "MCPBRIDGE_LOG", value_name = "LEVEL")]
    log_level: Option<String>,

    /// Name reported to clients during initialize.
    #[arg(long)]
    server_name: Option<String>,

    /// Version reported to clients during initialize.
    #[arg(long)]
    server_version: Option<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            backend_addr: self.backend_addr.clone(),
            connect_timeout_secs: self.connect_timeout,
            request_timeout_secs: self.request_timeout,
            log_level: self.log_level.clone(),
            server_name: self.server_name.clone(),
            server_version: self.server_version.clone(),
        }
    }
}

/// Everything that ends the process with a failure status.
#[derive(Debug)]
enum Fatal {
    Config(ConfigError),
    Signals(io::Error),
    Connect { addr: String, source: io::Error },
    Transport(TransportError),
}

impl fmt::Display for Fatal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::Signals(e) => write!(f, "cannot install signal handlers: {e}"),
            Self::Connect { addr, source } => {
                write!(f, "connect to backend at {addr}: {source}")
            }
            Self::Transport(e) => write!(f, "bridge stopped: {e}"),
        }
    }
}

impl From<ConfigError> for Fatal {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(reason) => {
            info!(target: targets::MCPBRIDGE, "exiting: {reason:?}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(target: targets::MCPBRIDGE, "{e}");
            // The logger may be off or not yet installed.
            eprintln!("mcpbridge: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<StopReason, Fatal> {
    let file = FileConfig::discover(cli.config.as_deref())?;
    let config = Config::resolve(cli.overrides(), file)?;
    // Only fails when a logger is already installed.
    let _ = StderrLogger::init(config.logging);

    let cancel = CancellationToken::new();
    install_signal_handlers(&cancel).map_err(Fatal::Signals)?;

    info!(
        target: targets::MCPBRIDGE,
        "connecting to backend at {}", config.backend_addr
    );
    let sender = TcpSender::connect(config.backend_addr.clone(), config.sender_config())
        .map_err(|source| Fatal::Connect {
            addr: config.backend_addr.clone(),
            source,
        })?;
    info!(target: targets::MCPBRIDGE, "connected to backend at {}", sender.addr());

    let bridge = Bridge::builder(sender)
        .server_info(config.server_name, config.server_version)
        .build();

    bridge
        .run(&cancel, io::stdin().lock(), io::stdout())
        .map_err(Fatal::Transport)
}

/// SIGINT and SIGTERM request a graceful stop; a second one exits at once.
fn install_signal_handlers(cancel: &CancellationToken) -> io::Result<()> {
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    let cancel = cancel.clone();
    std::thread::Builder::new()
        .name("mcpbridge-signals".to_string())
        .spawn(move || {
            for signal in signals.forever() {
                if cancel.is_cancelled() {
                    warn!(target: targets::MCPBRIDGE, "signal {signal} received again, exiting");
                    std::process::exit(1);
                }
                info!(
                    target: targets::MCPBRIDGE,
                    "signal {signal} received, stopping after the current request"
                );
                cancel.cancel();
            }
        })?;
    Ok(())
}
