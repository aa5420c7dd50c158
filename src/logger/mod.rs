//! Logger module
//!
//! Provides the injected [`Logger`] handle used by the server and handlers:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Leveled error/warning logging with key=value fields
//! - File-based logging support

mod format;
pub mod writer;

pub use format::{AccessLogEntry, AccessLogFormat};
pub use writer::LogWriter;

use crate::config::{Config, LoggingConfig};
use chrono::{Local, SecondsFormat};
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

/// Severity of an error-log entry, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
}

impl Level {
    const fn label(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" | "trace" => Ok(Self::Debug),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// Cloneable logging handle; clones share the same sinks
#[derive(Clone)]
pub struct Logger {
    writer: Arc<LogWriter>,
    level: Level,
    access_format: AccessLogFormat,
}

impl Logger {
    pub fn new(writer: LogWriter, level: Level, access_format: AccessLogFormat) -> Self {
        Self {
            writer: Arc::new(writer),
            level,
            access_format,
        }
    }

    /// Build the logger described by the `[logging]` section
    pub fn from_config(config: &LoggingConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let writer = LogWriter::open(
            config.access_log_file.as_deref(),
            config.error_log_file.as_deref(),
        )?;
        let level = config.level.parse::<Level>()?;
        let access_format = config.access_log_format.parse::<AccessLogFormat>()?;
        Ok(Self::new(writer, level, access_format))
    }

    pub const fn enabled(&self, level: Level) -> bool {
        level as u8 <= self.level as u8
    }

    fn write(&self, level: Level, message: &str, fields: &[(&str, &dyn Display)]) {
        if !self.enabled(level) {
            return;
        }
        let mut line = format!(
            "[{}] [{}] {message}",
            Local::now().to_rfc3339_opts(SecondsFormat::Millis, false),
            level.label()
        );
        for (key, value) in fields {
            line.push_str(&format!(" {key}={value}"));
        }
        match level {
            Level::Error | Level::Warn => self.writer.write_error(&line),
            Level::Info | Level::Debug => self.writer.write_access(&line),
        }
    }

    pub fn error(&self, message: &str, fields: &[(&str, &dyn Display)]) {
        self.write(Level::Error, message, fields);
    }

    pub fn warn(&self, message: &str, fields: &[(&str, &dyn Display)]) {
        self.write(Level::Warn, message, fields);
    }

    pub fn info(&self, message: &str, fields: &[(&str, &dyn Display)]) {
        self.write(Level::Info, message, fields);
    }

    pub fn debug(&self, message: &str, fields: &[(&str, &dyn Display)]) {
        self.write(Level::Debug, message, fields);
    }

    /// Write one access log line in the configured format
    pub fn access(&self, entry: &AccessLogEntry) {
        self.writer.write_access(&entry.format(self.access_format));
    }

    pub fn log_server_start(&self, addr: &SocketAddr, config: &Config) {
        self.info("server started", &[("addr", &format!("http://{addr}"))]);
        self.info("log level", &[("level", &config.logging.level)]);
        if let Some(workers) = config.server.workers {
            self.info("worker threads", &[("workers", &workers)]);
        }
        if let Some(ref path) = config.logging.access_log_file {
            self.info("access log", &[("path", path)]);
        }
        if let Some(ref path) = config.logging.error_log_file {
            self.info("error log", &[("path", path)]);
        }
        self.info(
            "resources",
            &[("views", &config.resources.views_dir().display())],
        );
    }
}

#[cfg(test)]
pub mod testing {
    //! In-memory sinks for asserting on log output

    use super::{AccessLogFormat, Level, LogWriter, Logger};
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    /// Shared byte buffer that collects everything written to it
    #[derive(Clone, Default)]
    pub struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        pub fn lines(&self) -> Vec<String> {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes)
                .lines()
                .map(ToString::to_string)
                .collect()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Logger at debug level whose access and error sinks are returned for inspection
    pub fn capturing_logger() -> (Logger, Captured, Captured) {
        let access = Captured::default();
        let error = Captured::default();
        let writer = LogWriter::from_streams(Box::new(access.clone()), Box::new(error.clone()));
        (
            Logger::new(writer, Level::Debug, AccessLogFormat::Common),
            access,
            error,
        )
    }
}
