//! Global logging module for the CPTML parser
//!
//! Thread-safe global logging with per-thread source context, code-tagged
//! events and a macro interface. Logging is a no-op until
//! [`init_global_logging`] has been called.

pub mod codes;
pub mod config;
pub mod events;
pub mod macros;
pub mod service;

use std::cell::RefCell;
use std::sync::{Arc, OnceLock};

// Re-export main types
pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{ConsoleLogger, Logger, LoggingService, MemoryLogger, StructuredLogger};

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

thread_local! {
    static SOURCE_CONTEXT: RefCell<Option<String>> = const { RefCell::new(None) };
}

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from the runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    let logging_service = Arc::new(service::create_configured_service());

    GLOBAL_LOGGER
        .set(logging_service.clone())
        .map_err(|_| "Global logger already initialized")?;

    logging_service.log_event(LogEvent::success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    ));

    Ok(())
}

/// Install a caller-built service, e.g. one backed by a [`MemoryLogger`]
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

// ============================================================================
// SOURCE CONTEXT
// ============================================================================

/// Run `f` with `name` (file path or "<input>") attached to every event
/// logged on this thread. The previous name is restored afterwards, so calls
/// nest.
pub fn with_source_context<F, R>(name: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = SOURCE_CONTEXT.with(|ctx| ctx.replace(Some(name.to_string())));
    let result = f();
    SOURCE_CONTEXT.with(|ctx| *ctx.borrow_mut() = previous);
    result
}

pub fn get_current_source_context() -> Option<String> {
    SOURCE_CONTEXT.with(|ctx| ctx.borrow().clone())
}

// ============================================================================
// EVENT DISPATCH
// ============================================================================

/// Attach context pairs and the thread's source name, then hand the event to
/// the global logger. Called by the logging macros.
pub fn emit(mut event: LogEvent, context: &[(&str, String)]) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };

    for (key, value) in context {
        event = event.with_context(key, value);
    }
    if let Some(source) = get_current_source_context() {
        event = event.with_context("source", &source);
    }

    logger.log_event(event);
}

/// Logging state and preferences, printed by `cptml --limits`
pub fn get_system_diagnostics() -> String {
    format!(
        "Logging initialized: {}\n{}\n",
        is_initialized(),
        config::get_config_summary()
    )
}
