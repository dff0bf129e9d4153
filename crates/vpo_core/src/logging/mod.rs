//! Logging infrastructure for Video Policy Orchestrator.
//!
//! The engine itself only emits `tracing` events. This module installs the
//! subscriber for binaries embedding the library:
//! - stderr output honouring `RUST_LOG`, falling back to a default level
//! - optional daily-rotated log files via `tracing-appender`
//!
//! # Example
//!
//! ```no_run
//! use vpo_core::logging::{init_tracing_with_file, LogLevel};
//!
//! // Keep the guard alive for the lifetime of the program
//! let _guard = init_tracing_with_file(LogLevel::Info, ".logs");
//! tracing::info!("Evaluating library");
//! ```

mod types;

pub use types::LogLevel;

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name prefix for rotated log files.
const LOG_FILE_PREFIX: &str = "vpo.log";

fn env_filter(default_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.name()))
}

/// Initialize global tracing subscriber for application-wide logging.
///
/// This sets up a subscriber that:
/// - Respects RUST_LOG environment variable
/// - Falls back to the provided default level
/// - Outputs to stderr with timestamps
///
/// Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(env_filter(default_level))
        .init();
}

/// Like [`init_tracing`], plus a non-blocking daily log file in `logs_folder`.
///
/// Log lines are flushed by a background worker until the returned guard
/// is dropped.
pub fn init_tracing_with_file(
    default_level: LogLevel,
    logs_folder: impl AsRef<Path>,
) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(logs_folder.as_ref(), LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(env_filter(default_level))
        .init();

    guard
}

/// Initialize tracing for tests (only logs warnings and above).
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
