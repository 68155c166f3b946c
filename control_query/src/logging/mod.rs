//! Global logging module for the control query engine
//!
//! Provides thread-safe global logging with code-tagged events and a clean macro
//! interface. Every entry point is a no-op until [`init_global_logging`] runs, so
//! library consumers that never initialize logging pay nothing.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{
    ConsoleLogger, FacadeLogger, Logger, LoggingService, MemoryLogger, NullLogger,
    StructuredLogger,
};

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from the configured preferences
pub fn init_global_logging() -> Result<(), String> {
    let logging_service = Arc::new(service::create_configured_service());
    init_global_logging_with_service(logging_service.clone())?;

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Initialize with custom service (facade bridging, testing)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service)
        .map_err(|_| "Global logger already initialized".to_string())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// Whether debug events would reach a logger (used by `log_debug!`)
pub fn debug_enabled() -> bool {
    try_get_global_logger()
        .map(|logger| logger.should_log(LogLevel::Debug))
        .unwrap_or(false)
}

// ============================================================================
// MACRO SUPPORT
// ============================================================================

/// Build and dispatch an event (used by all logging macros)
pub fn log_with_context(level: LogLevel, code: Code, message: &str, context: Vec<(&str, &str)>) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };
    if !logger.should_log(level) {
        return;
    }

    let mut event = match level {
        LogLevel::Error => LogEvent::error(code, message),
        LogLevel::Warning => LogEvent::warning_with_code(code, message),
        LogLevel::Info => LogEvent::success(code, message),
        LogLevel::Debug => LogEvent::debug_with_code(code, message),
    };

    for (key, value) in context {
        event = event.with_context(key, value);
    }

    logger.log_event(event);
}

/// Safe error logging (won't panic if uninitialized)
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_event(LogEvent::error(code, message));
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}

pub fn get_system_diagnostics() -> String {
    let mut diagnostics = String::new();

    diagnostics.push_str("=== Logging System Diagnostics ===\n");
    diagnostics.push_str(&format!("Initialized: {}\n", is_initialized()));
    if let Some(logger) = try_get_global_logger() {
        diagnostics.push_str(&format!("Active level: {}\n", logger.min_level().as_str()));
    }
    diagnostics.push('\n');
    diagnostics.push_str(&config::get_config_summary());

    diagnostics
}

/// Process-wide memory logger installed as the global service for tests.
///
/// Tests run in parallel against the same buffer, so assertions should look
/// for events carrying their own context (a path, a control id) rather than
/// counting everything.
#[cfg(test)]
pub(crate) fn test_capture() -> &'static MemoryLogger {
    static CAPTURE: OnceLock<Arc<MemoryLogger>> = OnceLock::new();
    CAPTURE.get_or_init(|| {
        let logger = service::create_test_logger();
        let service = LoggingService::new(logger.clone(), LogLevel::Info);
        let _ = init_global_logging_with_service(Arc::new(service));
        logger
    })
}
