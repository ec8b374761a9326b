//! Integration tests for the archiver logging system
//!
//! These tests swap the global logger, so every test is `#[serial]`.
//! No GPU or shader compiler required.
//!
//! Run with: cargo test --test logging_integration_tests

mod archiver_test_utils;

use archiver_test_utils::{all_backends, create_spy_device};
use galaxy_3d_archiver::galaxy3d::Archiver;
use galaxy_3d_archiver::galaxy3d::device::RenderDeviceTypeFlags;
use galaxy_3d_archiver::galaxy3d::log::{Logger, LogEntry, LogSeverity};
use galaxy_3d_archiver::galaxy3d::shader::{CompilerFamily, ShaderCreateInfo, ShaderStageFlags};
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

const DEVICE_SOURCE: &str = "galaxy3d::SerializationDevice";

fn device_entries(entries: &Arc<Mutex<Vec<LogEntry>>>, severity: LogSeverity) -> Vec<LogEntry> {
    entries
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.source == DEVICE_SOURCE && e.severity == severity)
        .cloned()
        .collect()
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_custom_logger() {
    let (test_logger, entries) = TestLogger::new();
    Archiver::set_logger(test_logger);

    Archiver::log(LogSeverity::Info, "test::module", "Test info message".to_string());
    Archiver::log(LogSeverity::Warn, "test::module", "Test warning message".to_string());

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 2);
        assert_eq!(captured[0].severity, LogSeverity::Info);
        assert_eq!(captured[0].source, "test::module");
        assert_eq!(captured[1].message, "Test warning message");
    }

    Archiver::reset_logger();
}

#[test]
#[serial]
fn test_integration_device_creation_logged() {
    let (test_logger, entries) = TestLogger::new();
    Archiver::set_logger(test_logger);

    let _device = create_spy_device(RenderDeviceTypeFlags::D3D12 | RenderDeviceTypeFlags::VULKAN, Vec::new());

    let infos = device_entries(&entries, LogSeverity::Info);
    assert_eq!(infos.len(), 1);
    assert!(infos[0].message.contains("Direct3D12"));
    assert!(infos[0].message.contains("Vulkan"));

    Archiver::reset_logger();
}

#[test]
#[serial]
fn test_integration_tolerated_failure_logged_as_warning() {
    let (mut device, _counters) = create_spy_device(all_backends(), vec![CompilerFamily::Fxc]);
    let info = ShaderCreateInfo::from_source("Sky PS", "float4 main() : SV_Target { return 0; }", ShaderStageFlags::PIXEL);

    let (test_logger, entries) = TestLogger::new();
    Archiver::set_logger(test_logger);

    let shader = device
        .create_shader(&info, RenderDeviceTypeFlags::D3D11 | RenderDeviceTypeFlags::D3D12)
        .unwrap();
    assert_eq!(shader.failures().len(), 1);

    let warnings = device_entries(&entries, LogSeverity::Warn);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("Sky PS"));
    assert!(warnings[0].message.contains("Direct3D11"));

    // One DEBUG entry per compile attempt, no ERROR since the call succeeded
    assert_eq!(device_entries(&entries, LogSeverity::Debug).len(), 2);
    assert!(device_entries(&entries, LogSeverity::Error).is_empty());

    Archiver::reset_logger();
}

#[test]
#[serial]
fn test_integration_errors_logged_with_location() {
    let (mut device, _counters) = create_spy_device(RenderDeviceTypeFlags::D3D12, Vec::new());
    let info = ShaderCreateInfo::from_source("Sky PS", "float4 main() : SV_Target { return 0; }", ShaderStageFlags::PIXEL);

    let (test_logger, entries) = TestLogger::new();
    Archiver::set_logger(test_logger);

    let err = device.create_shader(&info, RenderDeviceTypeFlags::METAL_IOS).unwrap_err();

    let errors = device_entries(&entries, LogSeverity::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(format!("Configuration error: {}", errors[0].message), err.to_string());
    assert!(errors[0].file.is_some());
    assert!(errors[0].line.is_some());

    Archiver::reset_logger();
}

#[test]
#[serial]
fn test_integration_logger_reset() {
    let (test_logger, entries) = TestLogger::new();
    Archiver::set_logger(test_logger);

    Archiver::log(LogSeverity::Info, "test", "Message 1".to_string());
    Archiver::reset_logger();
    Archiver::log(LogSeverity::Info, "test", "Message 2".to_string());

    assert_eq!(entries.lock().unwrap().len(), 1);
}
