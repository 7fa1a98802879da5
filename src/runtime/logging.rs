use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config;

const LOG_FILE: &str = "stagefront.log";

fn log_path(settings: &config::Settings) -> Option<PathBuf> {
    settings
        .logging
        .file
        .clone()
        .or_else(|| settings.data_dir().map(|d| d.join(LOG_FILE)))
}

/// Route `tracing` output to the log file; the terminal belongs to the UI.
///
/// The returned guard flushes the writer on drop and must outlive the app.
/// Without a usable log location logging stays off.
pub fn init_logging(settings: &config::Settings) -> Option<WorkerGuard> {
    let Some(path) = log_path(settings) else {
        eprintln!("stagefront: no log location (set logging.file or HOME); logging disabled");
        return None;
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name()?.to_owned();

    if let Err(e) = fs::create_dir_all(dir) {
        eprintln!(
            "stagefront: file logging disabled (cannot create {}): {e}",
            dir.display()
        );
        return None;
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.as_str()));
    let file_appender = rolling::never(dir, file_name);
    let (file_nb, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(file_nb)
        .compact();

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        return None;
    }
    tracing::info!(path = %path.display(), "logging initialised");
    Some(guard)
}
