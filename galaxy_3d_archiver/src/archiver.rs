/// Galaxy3D Archiver - process-wide logging facade
///
/// The serialization device itself is an ordinary owned value; the only
/// process-wide state of the archiver is the logger that every component
/// reports through. It is stored in a `OnceLock<RwLock<..>>` so tools can
/// swap it at startup and tests can capture output.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::error::Error;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

/// Logging entry point used by the `archiver_*!` macros
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_archiver::galaxy3d::{Archiver, log::{Logger, LogEntry}};
///
/// struct BuildLogger;
/// impl Logger for BuildLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Forward to the build system...
///     }
/// }
///
/// Archiver::set_logger(BuildLogger);
/// ```
pub struct Archiver;

impl Archiver {
    /// Replace the current logger
    pub fn set_logger<L: Logger + 'static>(logger_impl: L) {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(logger_impl);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Log a message without source location
    ///
    /// # Arguments
    ///
    /// * `severity` - Log severity level
    /// * `source` - Source module (e.g., "galaxy3d::SerializationDevice")
    /// * `message` - Log message
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Log a message with file:line information (used for ERROR logs)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }

    /// Log an error at ERROR severity and hand it back to the caller
    ///
    /// Used for structured variants (`CompilationFailure`, `CapacityExceeded`)
    /// that the `archiver_err!` macro does not build.
    #[track_caller]
    pub fn log_error(source: &str, error: Error) -> Error {
        let location = std::panic::Location::caller();
        Self::log_detailed(
            LogSeverity::Error,
            source,
            error.to_string(),
            location.file(),
            location.line(),
        );
        error
    }
}

#[cfg(test)]
#[path = "archiver_tests.rs"]
mod tests;
