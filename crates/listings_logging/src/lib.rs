#![deny(missing_docs)]
//! Shared logging utilities for the listings workspace.
//!
//! This crate provides the `listings_*` logging macros used across the
//! codebase and a minimal test initializer for the global logger. Every line
//! is tagged with the dispatch turn of the logging thread. Only the dispatch
//! loop sets a turn; lines from other threads carry turn 0.

use std::cell::Cell;

#[doc(hidden)]
pub use log as __log;

thread_local! {
    /// Thread-local storage for the current dispatch turn.
    static DISPATCH_TURN: Cell<u64> = const { Cell::new(0) };
}

/// Sets the dispatch turn for the current thread.
/// The dispatch loop calls this once per applied message.
pub fn set_turn(turn: u64) {
    DISPATCH_TURN.with(|v| v.set(turn));
}

/// Retrieves the dispatch turn for the current thread.
/// Returns 0 on threads that never dispatch (the engine thread, tests).
pub fn current_turn() -> u64 {
    DISPATCH_TURN.with(|v| v.get())
}

/// Logs a trace-level message tagged with the dispatch turn.
#[macro_export]
macro_rules! listings_trace {
    ($($arg:tt)*) => {{
        $crate::__log::trace!("[turn {}] {}", $crate::current_turn(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the dispatch turn.
#[macro_export]
macro_rules! listings_debug {
    ($($arg:tt)*) => {{
        $crate::__log::debug!("[turn {}] {}", $crate::current_turn(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the dispatch turn.
#[macro_export]
macro_rules! listings_info {
    ($($arg:tt)*) => {{
        $crate::__log::info!("[turn {}] {}", $crate::current_turn(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the dispatch turn.
#[macro_export]
macro_rules! listings_warn {
    ($($arg:tt)*) => {{
        $crate::__log::warn!("[turn {}] {}", $crate::current_turn(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the dispatch turn.
#[macro_export]
macro_rules! listings_error {
    ($($arg:tt)*) => {{
        $crate::__log::error!("[turn {}] {}", $crate::current_turn(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
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
    fn turn_is_thread_local() {
        set_turn(7);
        assert_eq!(current_turn(), 7);
        let other = std::thread::spawn(current_turn).join().unwrap();
        assert_eq!(other, 0);
    }

    #[test]
    fn macros_expand_without_a_logger() {
        initialize_for_tests();
        listings_info!("page {} of {}", 1, 3);
        listings_debug!("plain message");
        listings_trace!("x={x}", x = 1);
    }
}
