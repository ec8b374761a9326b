//! Unit tests for error.rs
//!
//! Tests all Error variants and their implementations (Display, Debug, Clone, kind()).

use crate::error::{Error, ErrorKind, Result};
use crate::device::RenderDeviceType;
use crate::signature::ResourceRange;

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_configuration_error_display() {
    let err = Error::ConfigurationError("Metal is not compiled in".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Configuration error"));
    assert!(display.contains("Metal is not compiled in"));
}

#[test]
fn test_compilation_failure_display() {
    let err = Error::CompilationFailure {
        device_type: RenderDeviceType::D3D12,
        diagnostics: "error X3000: syntax error".to_string(),
    };
    let display = format!("{}", err);
    assert!(display.contains("Compilation failed"));
    assert!(display.contains("Direct3D12"));
    assert!(display.contains("X3000"));
}

#[test]
fn test_capacity_exceeded_display() {
    let err = Error::CapacityExceeded {
        device_type: RenderDeviceType::MetalMacOs,
        resource: "g_Buffer31".to_string(),
        range: ResourceRange::Buffer,
        limit: 31,
    };
    let display = format!("{}", err);
    assert!(display.contains("Capacity exceeded"));
    assert!(display.contains("g_Buffer31"));
    assert!(display.contains("limit 31"));
}

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("failed to spawn xcrun".to_string());
    assert_eq!(format!("{}", err), "Backend error: failed to spawn xcrun");
}

// ============================================================================
// ERROR KIND
// ============================================================================

#[test]
fn test_error_kind() {
    assert_eq!(Error::ConfigurationError(String::new()).kind(), ErrorKind::ConfigurationError);
    assert_eq!(Error::BackendError(String::new()).kind(), ErrorKind::BackendError);
    assert_eq!(
        Error::CompilationFailure {
            device_type: RenderDeviceType::Vulkan,
            diagnostics: String::new(),
        }
        .kind(),
        ErrorKind::CompilationFailure
    );
    assert_eq!(
        Error::CapacityExceeded {
            device_type: RenderDeviceType::D3D11,
            resource: "cb".to_string(),
            range: ResourceRange::Cbv,
            limit: 14,
        }
        .kind(),
        ErrorKind::CapacityExceeded
    );
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::BackendError("io".to_string());
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let debug = format!("{:?}", Error::ConfigurationError("x".to_string()));
    assert!(debug.contains("ConfigurationError"));
}

#[test]
fn test_error_clone_eq() {
    let err1 = Error::CompilationFailure {
        device_type: RenderDeviceType::Vulkan,
        diagnostics: "bad".to_string(),
    };
    let err2 = err1.clone();
    assert_eq!(err1, err2);
}

#[test]
fn test_result_with_question_mark() {
    fn inner() -> Result<u32> {
        Err(Error::ConfigurationError("inner".to_string()))
    }
    fn outer() -> Result<u32> {
        let value = inner()?;
        Ok(value + 1)
    }
    assert_eq!(outer().unwrap_err().kind(), ErrorKind::ConfigurationError);
}
