// src/logging.rs
//! Tracing subscriber setup.

use std::fs::File;

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

use crate::config::LogConfig;

/// Keeps the file writer thread alive; drop it last.
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
///
/// With neither a file nor console output configured, nothing is installed and
/// tracing macros are no-ops.
pub fn init(config: &LogConfig) -> Result<Option<LogGuard>> {
    let level = LevelFilter::from_level(config.parse_level());
    let filter = || {
        EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy()
    };

    let console_layer = config.console_output.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(filter())
    });

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {:?}", path))?;
            let (writer, worker_guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter());
            (Some(layer), Some(LogGuard { _guard: worker_guard }))
        }
        None => (None, None),
    };

    if console_layer.is_none() && file_layer.is_none() {
        return Ok(None);
    }

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!("Logging initialized at level: {}", level);
    Ok(guard)
}
