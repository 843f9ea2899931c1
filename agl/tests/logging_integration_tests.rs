//! Integration tests for the AGL logging sink
//!
//! The logger is process-wide, so every test is #[serial]. No backend needed.

use agl::agl::{Error, Manager, Result};
use agl::agl::graphics::{DisplaySurface, PixelBuffer};
use agl::agl::log::{LogEntry, LogSeverity, Logger};
use agl::agl::render::RendererConfig;
use std::sync::{Arc, Mutex};
use serial_test::serial;

// ============================================================================
// TEST HELPERS
// ============================================================================

/// Logger capturing every entry
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

struct NoSurface;

impl DisplaySurface for NoSurface {
    fn setup_screen(&mut self, _width: u32, _height: u32, _fullscreen: bool, _accelerated: bool) -> Result<PixelBuffer> {
        Err(Error::SurfaceUnavailable("headless".to_string()))
    }

    fn present(&mut self, _frame: Option<&PixelBuffer>) -> Result<()> {
        Ok(())
    }
}

fn checked_divide(a: u32, b: u32) -> Result<u32> {
    if b == 0 {
        agl::agl_bail!("test::math", "division of {} by zero", a);
    }
    Ok(a / b)
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_macros_route_to_custom_logger() {
    let (logger, entries) = TestLogger::new();
    Manager::set_logger(logger);

    agl::agl_trace!("test::module", "trace {}", 1);
    agl::agl_info!("test::module", "info {}", 2);
    agl::agl_warn!("test::module", "warn {}", 3);
    agl::agl_error!("test::module", "error {}", 4);

    let captured = entries.lock().unwrap().clone();
    Manager::reset_logger();

    let severities: Vec<LogSeverity> = captured.iter().map(|e| e.severity).collect();
    assert_eq!(
        severities,
        vec![LogSeverity::Trace, LogSeverity::Info, LogSeverity::Warn, LogSeverity::Error]
    );
    assert!(captured.iter().all(|e| e.source == "test::module"));
    assert_eq!(captured[2].message, "warn 3");
    assert!(captured[2].file.is_none());
    assert!(captured[3].file.is_some_and(|f| f.ends_with("logging_integration_tests.rs")));
    assert!(captured[3].line.is_some());
}

#[test]
#[serial]
fn test_bail_logs_and_returns_backend_error() {
    let (logger, entries) = TestLogger::new();
    Manager::set_logger(logger);

    let result = checked_divide(7, 0);
    let captured = entries.lock().unwrap().clone();
    Manager::reset_logger();

    assert!(matches!(result, Err(Error::BackendError(ref m)) if m == "division of 7 by zero"));
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].severity, LogSeverity::Error);
    assert_eq!(captured[0].source, "test::math");
    assert_eq!(checked_divide(8, 2).unwrap(), 4);
}

#[test]
#[serial]
fn test_failed_init_is_logged() {
    Manager::shutdown();
    let (logger, entries) = TestLogger::new();
    Manager::set_logger(logger);

    let result = Manager::init("NoSuchBackend", Box::new(NoSurface), RendererConfig::default());
    let captured = entries.lock().unwrap().clone();
    Manager::reset_logger();

    assert!(matches!(result, Err(Error::InitializationFailed(_))));
    assert!(!Manager::is_initialized());
    assert!(captured
        .iter()
        .any(|e| e.severity == LogSeverity::Error && e.message.contains("NoSuchBackend")));
}

#[test]
#[serial]
fn test_use_before_init_is_logged() {
    Manager::shutdown();
    let (logger, entries) = TestLogger::new();
    Manager::set_logger(logger);

    let result = Manager::setup_camera(60.0, 1.0, 100.0, 0.0);
    let captured = entries.lock().unwrap().clone();
    Manager::reset_logger();

    assert!(matches!(result, Err(Error::InitializationFailed(_))));
    assert!(captured.iter().any(|e| e.severity == LogSeverity::Error));
}
