use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// Keeps the file writer flushing until dropped.
pub struct LoggingGuard {
    _guard: Option<WorkerGuard>,
    pub log_path: Option<PathBuf>,
}

fn filter(logging: &LoggingConfig) -> EnvFilter {
    let level = logging.level().unwrap_or(Level::INFO);
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Installs the global subscriber: JSON lines into `logging.file` when set,
/// human-readable stderr output otherwise.
pub fn init_logging(logging: &LoggingConfig) -> Result<LoggingGuard> {
    let Some(log_path) = logging.file.clone() else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(filter(logging))
            .with_target(false)
            .with_thread_names(true)
            .with_writer(std::io::stderr)
            .finish();
        // Ignore error if a global subscriber is already set (e.g., when running in tests)
        let _ = tracing::subscriber::set_global_default(subscriber);
        return Ok(LoggingGuard {
            _guard: None,
            log_path: None,
        });
    };

    if let Some(dir) = log_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory at {}", dir.display()))?;
    }
    let file = File::create(&log_path)
        .with_context(|| format!("creating log file at {}", log_path.display()))?;

    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter(logging))
        .json()
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_thread_names(true)
        .with_writer(writer)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);

    Ok(LoggingGuard {
        _guard: Some(guard),
        log_path: Some(log_path),
    })
}
