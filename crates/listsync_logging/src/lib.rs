#![deny(missing_docs)]
//! Shared logging utilities for the listsync workspace.
//!
//! This crate provides the `sync_*` logging macros used across the codebase,
//! a thread-local request context that tags log lines emitted while a page
//! response is being handled, and a minimal test initializer for the global logger.

use std::cell::Cell;

/// Re-export of the logging facade used by the macros.
#[doc(hidden)]
pub use log;

thread_local! {
    /// Thread-local storage for the request id currently being handled.
    static REQUEST_CONTEXT: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Sets the request id for the current thread.
/// Pass `None` once the response has been applied or discarded.
pub fn set_request_context(request_id: Option<u64>) {
    REQUEST_CONTEXT.with(|v| v.set(request_id));
}

/// Retrieves the request id for the current thread, if one is set.
pub fn request_context() -> Option<u64> {
    REQUEST_CONTEXT.with(|v| v.get())
}

/// Runs `f` with the request context set to `request_id`, restoring the
/// previous context afterwards.
pub fn with_request_context<R>(request_id: u64, f: impl FnOnce() -> R) -> R {
    let previous = request_context();
    set_request_context(Some(request_id));
    let result = f();
    set_request_context(previous);
    result
}

/// Formats the current request context as a log line prefix.
#[doc(hidden)]
pub fn context_prefix() -> String {
    match request_context() {
        Some(id) => format!("[req {id}] "),
        None => String::new(),
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! sync_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! sync_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! sync_info {
    ($($arg:tt)*) => {{
        $crate::log::info!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! sync_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! sync_error {
    ($($arg:tt)*) => {{
        $crate::log::error!("{}{}", $crate::context_prefix(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_context_is_restored_after_scope() {
        set_request_context(None);
        let inner = with_request_context(7, || {
            assert_eq!(context_prefix(), "[req 7] ");
            request_context()
        });
        assert_eq!(inner, Some(7));
        assert_eq!(request_context(), None);
        assert_eq!(context_prefix(), "");
    }
}
