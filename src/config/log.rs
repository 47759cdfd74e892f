// src/config/log.rs
//! Logging settings.

use std::path::PathBuf;

use tracing::Level;

/// Where and how verbosely to log.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default level when `RUST_LOG` is unset ("error" .. "trace")
    pub level: String,
    /// Log file; the terminal belongs to the UI so console output is opt-in
    pub file: Option<PathBuf>,
    /// Write to stderr instead of (or in addition to) the file
    pub console_output: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            console_output: false,
        }
    }
}

impl LogConfig {
    /// Parse the configured level, falling back to INFO.
    pub fn parse_level(&self) -> Level {
        self.level.parse().unwrap_or(Level::INFO)
    }
}
