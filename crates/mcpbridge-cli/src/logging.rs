//! Plain log output to stderr.
//!
//! stdout carries the protocol stream, so every log line goes to stderr:
//!
//! ```text
//! 14:02:11 INFO  mcpbridge::bridge: bridge started
//! ```

use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use time::OffsetDateTime;
use time::macros::format_description;

/// How the stderr logger formats and filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Most verbose level written.
    pub level: LevelFilter,
    /// Prefix each line with a UTC `HH:MM:SS` timestamp.
    pub timestamps: bool,
    /// Include the record target.
    pub targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            timestamps: true,
            targets: true,
        }
    }
}

/// A `log` implementation writing one line per record to stderr.
#[derive(Debug)]
pub struct StderrLogger {
    config: LoggingConfig,
}

impl StderrLogger {
    #[must_use]
    pub fn new(config: LoggingConfig) -> Self {
        Self { config }
    }

    /// Installs the logger globally.
    ///
    /// Fails if a logger has already been set.
    pub fn init(config: LoggingConfig) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(Self::new(config)))?;
        log::set_max_level(config.level);
        Ok(())
    }

    fn format_record(&self, record: &Record<'_>) -> String {
        let mut line = String::new();
        if self.config.timestamps {
            let now = OffsetDateTime::now_utc();
            if let Ok(ts) = now.format(format_description!("[hour]:[minute]:[second]")) {
                line.push_str(&ts);
                line.push(' ');
            }
        }
        line.push_str(&format!("{:<5} ", record.level()));
        if self.config.targets {
            line.push_str(record.target());
            line.push_str(": ");
        }
        line.push_str(&record.args().to_string());
        line
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.config.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format_record(record);
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    fn format(config: LoggingConfig, level: Level, target: &str, msg: &str) -> String {
        let logger = StderrLogger::new(config);
        logger.format_record(
            &Record::builder()
                .level(level)
                .target(target)
                .args(format_args!("{msg}"))
                .build(),
        )
    }

    #[test]
    fn plain_line_without_timestamp() {
        let config = LoggingConfig {
            timestamps: false,
            ..LoggingConfig::default()
        };
        assert_eq!(
            format(config, Level::Warn, "mcpbridge::backend", "dropped"),
            "WARN  mcpbridge::backend: dropped"
        );
    }

    #[test]
    fn targets_can_be_hidden() {
        let config = LoggingConfig {
            level: LevelFilter::Debug,
            timestamps: false,
            targets: false,
        };
        assert_eq!(format(config, Level::Debug, "x", "hi"), "DEBUG hi");
    }

    #[test]
    fn timestamp_prefix() {
        let line = format(LoggingConfig::default(), Level::Info, "t", "m");
        let (ts, rest) = line.split_at(8);
        assert_eq!(ts.len(), 8);
        assert_eq!(ts.as_bytes()[2], b':');
        assert_eq!(ts.as_bytes()[5], b':');
        assert_eq!(rest, " INFO  t: m");
    }

    #[test]
    fn filters_by_level() {
        let logger = StderrLogger::new(LoggingConfig::default());
        let debug = Metadata::builder().level(Level::Debug).build();
        let error = Metadata::builder().level(Level::Error).build();
        assert!(!logger.enabled(&debug));
        assert!(logger.enabled(&error));
    }
}
