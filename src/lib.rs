// src/lib.rs
//! Beatscope - real-time audio analysis for audio-reactive visuals.
//!
//! The [`analysis`] pipeline turns a live file or microphone signal into eight
//! smoothed energy bands, named perceptual ranges, a volume level and beat
//! pulses. [`app`] and [`ui`] are a terminal host that polls it every frame.

pub mod analysis;
pub mod app;
pub mod audio;
pub mod config;
pub mod error;
pub mod fs;
pub mod logging;
pub mod ui;

pub use analysis::{AnalysisFrame, AudioAnalyzer, AudioBands};
pub use config::AnalyzerConfig;
pub use error::{AudioError, AudioResult};
