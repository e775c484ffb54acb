//! Logging infrastructure for TUBERAG.
//!
//! Structured logging via the `tracing` ecosystem:
//!
//! - JSON lines to a daily-rolling file under `<data-dir>/logs/`
//! - Compact human-readable output on stderr (stdout is reserved for the
//!   chat session itself)
//! - `-v` flag raises the level to DEBUG
//!
//! ## Example
//!
//! ```no_run
//! use tuberag_core::logging;
//!
//! // Initialize logging (call once at startup)
//! let _guard = logging::init_logging("/tmp/tuberag/logs".into(), false).expect("logging init");
//!
//! tracing::info!("tuberag started");
//! tracing::debug!(video_id = "dQw4w9WgXcQ", "fetching transcript");
//! ```

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::error::{CoreError, Result};

/// Guard that must be held to ensure log flushing on shutdown.
///
/// When dropped, pending log entries are flushed. Keep it alive for the
/// lifetime of the application.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the TUBERAG logging system.
///
/// # Arguments
///
/// * `log_dir` - Directory for the daily-rolling `tuberag.log` files.
/// * `verbose` - If true, sets log level to DEBUG. Otherwise uses INFO.
///
/// # Returns
///
/// A [`LogGuard`] that must be held for the application lifetime.
pub fn init_logging(log_dir: PathBuf, verbose: bool) -> Result<LogGuard> {
    std::fs::create_dir_all(&log_dir).map_err(|e| CoreError::DirectoryCreation {
        path: log_dir.clone(),
        source: e,
    })?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "tuberag.log");
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tuberag={default_level}")));

    // JSON layer for file output
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_current_span(true);

    // Human-readable layer for console output, on stderr so it never
    // interleaves with the prompt loop on stdout.
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::debug!(log_dir = %log_dir.display(), verbose, "logging initialized");

    Ok(LogGuard {
        _file_guard: Some(file_guard),
    })
}

/// Initialize minimal console-only logging for testing.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
