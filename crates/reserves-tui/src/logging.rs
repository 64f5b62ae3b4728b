//! File logging. The terminal belongs to the UI, so nothing is written to stdout.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log directory.
const LOG_DIR_ENV: &str = "RESERVES_LOG_DIR";

/// Installs a daily-rolling file subscriber filtered by `RUST_LOG`.
///
/// Keep the returned guard alive for the life of the process so buffered
/// lines are flushed on exit.
pub(crate) fn init() -> io::Result<WorkerGuard> {
    let log_dir = std::env::var_os(LOG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("logs"));
    fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "reserves.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(env_filter)
        .init();

    Ok(guard)
}
