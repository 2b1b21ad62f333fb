use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "onsong-library.log";

/// Route `tracing` output to a file under `log_dir`. The terminal belongs to
/// the TUI, so nothing is written to stdout or stderr.
///
/// `RUST_LOG` takes precedence over `default_filter`. Keep the returned guard
/// alive for the whole run; dropping it flushes and stops the writer thread.
pub fn init(log_dir: &Path, default_filter: &str) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .with_context(|| format!("invalid log filter {default_filter:?}"))?;

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))?;

    Ok(guard)
}
