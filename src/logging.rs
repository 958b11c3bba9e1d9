use crate::config::project_dirs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE: &str = "movie-browser.log";

fn default_log_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().join(LOG_FILE))
}

/// Route tracing output to a file; the terminal belongs to the UI.
///
/// `RUST_LOG` takes precedence over `level`. Keep the guard alive until exit
/// so buffered lines are flushed.
pub fn init(log_file: Option<&Path>, level: &str) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let path = log_file
        .map(Path::to_path_buf)
        .or_else(default_log_path)
        .ok_or("Could not determine log directory")?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path.file_name().ok_or("Invalid log file path")?;
    std::fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .finish()
        .try_init()?;

    Ok(guard)
}
