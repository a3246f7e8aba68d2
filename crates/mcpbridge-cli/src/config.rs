//! Configuration loading.
//!
//! Settings come from four layers, highest precedence first:
//!
//! 1. Command-line flags
//! 2. Environment variables (resolved by clap for the flags that have one)
//! 3. The TOML config file
//! 4. Built-in defaults
//!
//! ```toml
//! [backend]
//! addr = "localhost:9100"
//! connect_timeout_secs = 10
//! request_timeout_secs = 0
//!
//! [server]
//! name = "mcpbridge"
//! version = "0.1.0"
//!
//! [log]
//! level = "info"
//! timestamps = true
//! targets = true
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use mcpbridge_backend::TcpSenderConfig;
use mcpbridge_server::{DEFAULT_SERVER_NAME, DEFAULT_SERVER_VERSION};
use serde::Deserialize;

use crate::logging::LoggingConfig;

/// Backend address used when nothing else is configured.
pub const DEFAULT_BACKEND_ADDR: &str = "localhost:9100";

/// Connect timeout used when nothing else is configured.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Errors
// ============================================================================

/// Failure to produce a usable configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The config file is not valid TOML for this schema.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// A setting has an unusable value.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "invalid config {}: {source}", path.display())
            }
            Self::Invalid(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

// ============================================================================
// File schema
// ============================================================================

/// The on-disk config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub backend: BackendSection,
    pub server: ServerSection,
    pub log: LogSection,
}

/// `[backend]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendSection {
    pub addr: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

/// `[server]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub name: Option<String>,
    pub version: Option<String>,
}

/// `[log]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSection {
    pub level: Option<String>,
    pub timestamps: Option<bool>,
    pub targets: Option<bool>,
}

impl FileConfig {
    /// Parses a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the explicit path, or the default path if that file exists.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file is not.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }
}

/// `<config_dir>/mcpbridge/config.toml`, if the platform has a config dir.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mcpbridge").join("config.toml"))
}

// ============================================================================
// Resolved settings
// ============================================================================

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub backend_addr: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
    pub server_name: Option<String>,
    pub server_version: Option<String>,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend_addr: String,
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
    pub server_name: String,
    pub server_version: String,
    pub logging: LoggingConfig,
}

impl Config {
    /// Layers overrides on top of the file and the defaults.
    pub fn resolve(overrides: Overrides, file: FileConfig) -> Result<Self, ConfigError> {
        let backend_addr = overrides
            .backend_addr
            .or(file.backend.addr)
            .unwrap_or_else(|| DEFAULT_BACKEND_ADDR.to_string());
        if backend_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("backend address is empty".to_string()));
        }

        let connect_timeout = seconds(
            overrides
                .connect_timeout_secs
                .or(file.backend.connect_timeout_secs)
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        );
        let request_timeout = seconds(
            overrides
                .request_timeout_secs
                .or(file.backend.request_timeout_secs)
                .unwrap_or(0),
        );

        let defaults = LoggingConfig::default();
        let level = match overrides.log_level.or(file.log.level) {
            Some(level) => parse_level(&level)?,
            None => defaults.level,
        };
        let logging = LoggingConfig {
            level,
            timestamps: file.log.timestamps.unwrap_or(defaults.timestamps),
            targets: file.log.targets.unwrap_or(defaults.targets),
        };

        Ok(Self {
            backend_addr,
            connect_timeout,
            request_timeout,
            server_name: overrides
                .server_name
                .or(file.server.name)
                .unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string()),
            server_version: overrides
                .server_version
                .or(file.server.version)
                .unwrap_or_else(|| DEFAULT_SERVER_VERSION.to_string()),
            logging,
        })
    }

    /// Settings for the backend connection.
    #[must_use]
    pub fn sender_config(&self) -> TcpSenderConfig {
        TcpSenderConfig {
            connect_timeout: self.connect_timeout,
            request_timeout: self.request_timeout,
            ..TcpSenderConfig::default()
        }
    }
}

/// Zero means no timeout.
fn seconds(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Parses a level name: off, error, warn, info, debug or trace.
pub fn parse_level(s: &str) -> Result<LevelFilter, ConfigError> {
    match s.trim().to_lowercase().as_str() {
        "off" => Ok(LevelFilter::Off),
        "error" => Ok(LevelFilter::Error),
        "warn" | "warning" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        other => Err(ConfigError::Invalid(format!("unknown log level: {other}"))),
    }
}
