#![deny(missing_docs)]
//! Shared logging utilities for the recipe workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! the [`ErrorReporter`] interface that components receive instead of logging
//! failures directly, and a minimal test initializer for the global logger.

use std::sync::{Mutex, PoisonError};

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Sink for failures that are recovered or surfaced elsewhere but should
/// still be observable.
///
/// `context` names the operation that failed (for example `"health probe"`).
pub trait ErrorReporter: Send + Sync {
    /// Records one failure.
    fn report(&self, context: &str, message: &str);
}

/// Forwards reports to the global logger at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, context: &str, message: &str) {
        engine_warn!("{} failed: {}", context, message);
    }
}

/// A single captured report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Operation that failed.
    pub context: String,
    /// Failure description.
    pub message: String,
}

/// Keeps reports in memory so tests can assert on them.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    reports: Mutex<Vec<Report>>,
}

impl MemoryReporter {
    /// Creates an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything reported so far.
    pub fn reports(&self) -> Vec<Report> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of reports with the given context.
    pub fn count(&self, context: &str) -> usize {
        self.reports()
            .iter()
            .filter(|report| report.context == context)
            .count()
    }
}

impl ErrorReporter for MemoryReporter {
    fn report(&self, context: &str, message: &str) {
        engine_debug!("captured report {}: {}", context, message);
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Report {
                context: context.to_string(),
                message: message.to_string(),
            });
    }
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
