// src/config/mod.rs
//! Configuration module for analyzer settings, logging, and command-line options.

pub mod analyzer;
pub mod cli;
pub mod log;

// Re-export commonly used types
pub use analyzer::AnalyzerConfig;
pub use cli::Args;
pub use log::LogConfig;
