//! File-based logging for the TUI.
//!
//! The terminal UI owns stdout/stderr, so tracing output only ever goes to a
//! log file, and only when one is configured or `RUST_LOG` is set.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Guard that must be kept alive for the duration of logging.
///
/// When this guard is dropped, pending log entries are flushed.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Decide where logs go.
///
/// # Arguments
/// * `log_file` - Log file from the configuration
/// * `rust_log_set` - Whether `RUST_LOG` is present in the environment
///
/// # Returns
/// * `Option<PathBuf>` - Log file path, or None when logging stays off
///
/// # Details
/// The configured file wins. Without one, setting `RUST_LOG` logs to
/// `exec-tui.log` in the system temp directory.
pub fn log_file_path(log_file: Option<&str>, rust_log_set: bool) -> Option<PathBuf> {
    match log_file {
        Some(path) => Some(PathBuf::from(path)),
        None if rust_log_set => Some(std::env::temp_dir().join("exec-tui.log")),
        None => None,
    }
}

/// Initialize file-only logging for TUI mode.
///
/// Returns a guard that must be held until shutdown.
pub fn init_tui_logging(log_file: Option<&str>) -> LogGuard {
    let rust_log_set = std::env::var("RUST_LOG").is_ok();

    let (file_layer, file_guard) = match log_file_path(log_file, rust_log_set) {
        Some(path) => {
            let parent_dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let filename = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("exec-tui.log");

            let file_appender = tracing_appender::rolling::never(parent_dir, filename);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let env_filter = EnvFilter::builder()
                .with_default_directive(LevelFilter::DEBUG.into())
                .from_env_lossy();

            let file_layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_timer(fmt::time::uptime())
                .with_writer(non_blocking)
                .with_filter(env_filter);

            (Some(file_layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry().with(file_layer).init();

    LogGuard {
        _file_guard: file_guard,
    }
}
