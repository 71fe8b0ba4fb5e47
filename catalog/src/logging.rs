use anyhow::Result;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing with file-based logging.
///
/// Logs go to `log_dir` when configured, otherwise to
/// `~/.config/catalog/logs`, one `catalog-YYYY-MM-DD-HH-MM-SS.log` per run.
/// Nothing is written to stdout, which belongs to the interactive prompt.
pub fn init_logging(log_dir: Option<&Path>) -> Result<PathBuf> {
    // Resolve and create the logs directory
    let logs_dir = match log_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_logs_dir()?,
    };
    std::fs::create_dir_all(&logs_dir)?;

    let log_filename = log_file_name(Local::now());
    let log_path = logs_dir.join(&log_filename);

    // Non-blocking so a slow disk never stalls a request
    let file_appender = tracing_appender::rolling::never(&logs_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // No ANSI codes in log file
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    // INFO unless RUST_LOG says otherwise, e.g. RUST_LOG=catalog_api=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    // The writer must outlive every log call
    std::mem::forget(guard);

    Ok(log_path)
}

fn default_logs_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or(anyhow::anyhow!("Could not find config directory"))?
        .join("catalog")
        .join("logs"))
}

fn log_file_name(started: DateTime<Local>) -> String {
    format!("catalog-{}.log", started.format("%Y-%m-%d-%H-%M-%S"))
}
