//! Logging initialization
//!
//! Called once by each service entry point. Events go to stderr and, when a
//! log file is configured, to that file as well through a non-blocking
//! writer. `RUST_LOG` overrides the configured level.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::{Error, Result};

/// Keeps the file writer flushing until dropped
///
/// Hold this in `main` for the life of the process.
pub struct LoggingGuard(Option<WorkerGuard>);

impl LoggingGuard {
    /// True when events are also written to a log file
    pub fn has_file_output(&self) -> bool {
        self.0.is_some()
    }
}

/// Build the filter from `RUST_LOG`, falling back to the configured level
pub fn build_filter(cfg: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.level))
}

/// Install the global subscriber
pub fn init_logging(cfg: &LoggingConfig) -> Result<LoggingGuard> {
    let (file_layer, guard) = match cfg.file.as_deref() {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(build_filter(cfg))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    Ok(LoggingGuard(guard))
}

fn file_writer(path: &Path) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::Config(format!("Log file has no name: {}", path.display())))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}
