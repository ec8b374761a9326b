//! Error types for the Galaxy3D archiver
//!
//! This module defines the error types returned by the serialization device,
//! the binding normalizer and the configuration loader.

use std::fmt;
use crate::device::RenderDeviceType;
use crate::signature::ResourceRange;

/// Result type for Galaxy3D archiver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D archiver errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Requested backend is not available in this build/device, or the input
    /// description is malformed (duplicate names, dangling attachment references, ...)
    ConfigurationError(String),

    /// A backend compiler or toolchain rejected the shader
    CompilationFailure {
        /// Backend whose compiler failed
        device_type: RenderDeviceType,
        /// Compiler diagnostic text
        diagnostics: String,
    },

    /// A backend-native resource limit would be violated
    CapacityExceeded {
        /// Backend whose limit is exceeded
        device_type: RenderDeviceType,
        /// Name of the first resource that does not fit
        resource: String,
        /// Slot range that overflowed
        range: ResourceRange,
        /// Maximum number of slots in that range
        limit: u32,
    },

    /// Host-side I/O failure outside a compile (reading a configuration file)
    BackendError(String),
}

/// Error discriminant, convenient for matching without destructuring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigurationError,
    CompilationFailure,
    CapacityExceeded,
    BackendError,
}

impl Error {
    /// Discriminant of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ConfigurationError(_) => ErrorKind::ConfigurationError,
            Error::CompilationFailure { .. } => ErrorKind::CompilationFailure,
            Error::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            Error::BackendError(_) => ErrorKind::BackendError,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            Error::CompilationFailure { device_type, diagnostics } => {
                write!(f, "Compilation failed for {}: {}", device_type, diagnostics)
            }
            Error::CapacityExceeded { device_type, resource, range, limit } => write!(
                f,
                "Capacity exceeded for {}: resource '{}' does not fit in {:?} range (limit {})",
                device_type, resource, range, limit
            ),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
