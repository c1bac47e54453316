//! Log writer module
//!
//! Thread-safe log output to files or stdout/stderr. Initialized once at
//! startup; until then messages fall back to the standard streams.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use super::level::LogLevel;

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

impl LogTarget {
    fn open(path: Option<&str>, fallback: Self) -> io::Result<Self> {
        match path {
            Some(path) => Ok(Self::File(Mutex::new(open_log_file(path)?))),
            None => Ok(fallback),
        }
    }

    fn write_line(&self, message: &str) {
        match self {
            Self::Stdout => println!("{message}"),
            Self::Stderr => eprintln!("{message}"),
            Self::File(file) => {
                if let Ok(mut f) = file.lock() {
                    let _ = writeln!(f, "{message}");
                }
            }
        }
    }
}

/// Thread-safe log writer
pub struct LogWriter {
    /// Access and info messages
    access: LogTarget,
    /// Warnings and errors
    error: LogTarget,
    /// Minimum severity written
    level: LogLevel,
}

impl LogWriter {
    fn new(
        access_log_file: Option<&str>,
        error_log_file: Option<&str>,
        level: LogLevel,
    ) -> io::Result<Self> {
        Ok(Self {
            access: LogTarget::open(access_log_file, LogTarget::Stdout)?,
            error: LogTarget::open(error_log_file, LogTarget::Stderr)?,
            level,
        })
    }

    /// Write to access log (not subject to level filtering)
    pub fn write_access(&self, message: &str) {
        self.access.write_line(message);
    }

    /// Write a message at `level`, routed by severity
    pub fn write(&self, level: LogLevel, message: &str) {
        if level < self.level {
            return;
        }
        if level >= LogLevel::Warn {
            self.error.write_line(message);
        } else {
            self.access.write_line(message);
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

/// Initialize the global log writer
///
/// Returns error if log files cannot be opened or the writer was already set.
pub fn init(
    access_log_file: Option<&str>,
    error_log_file: Option<&str>,
    level: LogLevel,
) -> io::Result<()> {
    let writer = LogWriter::new(access_log_file, error_log_file, level)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, if initialized
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_targets_respect_level() {
        let dir = std::env::temp_dir().join(format!("weekly-portal-log-{}", std::process::id()));
        let access = dir.join("nested/access.log");
        let error = dir.join("error.log");

        let writer = LogWriter::new(
            access.to_str(),
            error.to_str(),
            LogLevel::Info,
        )
        .unwrap();
        writer.write(LogLevel::Debug, "hidden");
        writer.write(LogLevel::Info, "started");
        writer.write(LogLevel::Error, "broken");
        writer.write_access("GET /landing");

        let access_text = std::fs::read_to_string(&access).unwrap();
        let error_text = std::fs::read_to_string(&error).unwrap();
        assert_eq!(access_text, "started\nGET /landing\n");
        assert_eq!(error_text, "broken\n");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
