//! Log writer module
//!
//! Thread-safe sinks for the access and error logs.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File(File),
    /// In-memory sink used to capture log output
    #[cfg(test)]
    Stream(Box<dyn Write + Send>),
}

impl LogTarget {
    fn file_or(path: Option<&str>, fallback: Self) -> io::Result<Self> {
        match path {
            Some(p) => Ok(Self::File(open_log_file(p)?)),
            None => Ok(fallback),
        }
    }

    fn write_line(&mut self, message: &str) {
        // A failing log sink must never fail the request being logged
        let _ = match self {
            Self::Stdout => writeln!(io::stdout().lock(), "{message}"),
            Self::Stderr => writeln!(io::stderr().lock(), "{message}"),
            Self::File(f) => writeln!(f, "{message}"),
            #[cfg(test)]
            Self::Stream(w) => writeln!(w, "{message}").and_then(|()| w.flush()),
        };
    }
}

/// Thread-safe log writer
pub struct LogWriter {
    access: Mutex<LogTarget>,
    error: Mutex<LogTarget>,
}

impl LogWriter {
    /// Open the given log files, falling back to stdout/stderr when unset
    pub fn open(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<Self> {
        Ok(Self {
            access: Mutex::new(LogTarget::file_or(access_log_file, LogTarget::Stdout)?),
            error: Mutex::new(LogTarget::file_or(error_log_file, LogTarget::Stderr)?),
        })
    }

    /// Write both logs into caller-supplied sinks
    #[cfg(test)]
    pub fn from_streams(access: Box<dyn Write + Send>, error: Box<dyn Write + Send>) -> Self {
        Self {
            access: Mutex::new(LogTarget::Stream(access)),
            error: Mutex::new(LogTarget::Stream(error)),
        }
    }

    pub fn write_access(&self, message: &str) {
        if let Ok(mut target) = self.access.lock() {
            target.write_line(message);
        }
    }

    pub fn write_error(&self, message: &str) {
        if let Ok(mut target) = self.error.lock() {
            target.write_line(message);
        }
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}
