// src/config/cli.rs
//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;

use super::{AnalyzerConfig, LogConfig};

/// Real-time audio-reactive analysis in the terminal
#[derive(Parser, Debug)]
#[command(name = "beatscope")]
#[command(about = "Audio-reactive band, range and beat analysis for a file or microphone")]
pub struct Args {
    /// Audio file to play and analyze on startup
    pub file: Option<PathBuf>,

    /// Start with the microphone as source (ignored when a file is given)
    #[arg(long)]
    pub mic: bool,

    /// Audio input device name (uses default if not specified)
    #[arg(long)]
    pub device: Option<String>,

    /// FFT size (power of two, 32..=32768)
    #[arg(long, default_value_t = 2048)]
    pub fft_size: usize,

    /// Spectrum smoothing time constant (clamped to 0..=0.95)
    #[arg(long, default_value_t = 0.8)]
    pub smoothing: f32,

    /// Level mapped to the bottom of the byte spectrum
    #[arg(long, default_value_t = -90.0, allow_hyphen_values = true)]
    pub min_db: f32,

    /// Level mapped to the top of the byte spectrum
    #[arg(long, default_value_t = -10.0, allow_hyphen_values = true)]
    pub max_db: f32,

    /// Query the analyzer every Nth rendered frame
    #[arg(long, default_value_t = 2)]
    pub frame_skip: u32,

    /// Render loop rate in frames per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Print analysis frames to stdout instead of drawing the terminal UI
    #[arg(long)]
    pub headless: bool,

    /// Number of frames to print in headless mode (runs until source ends if omitted)
    #[arg(long)]
    pub frames: Option<u64>,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Analyzer settings requested on the command line (validated later).
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            fft_size: self.fft_size,
            smoothing_time_constant: self.smoothing,
            min_decibels: self.min_db,
            max_decibels: self.max_db,
        }
    }

    /// Logging settings; headless runs log to stderr.
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone(),
            file: self.log_file.clone(),
            console_output: self.headless,
        }
    }
}
