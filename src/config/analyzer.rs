// src/config/analyzer.rs
//! Analyzer construction parameters and their validation.

use crate::error::{AudioError, AudioResult};

/// Smallest accepted FFT size.
pub const MIN_FFT_SIZE: usize = 32;
/// Largest accepted FFT size.
pub const MAX_FFT_SIZE: usize = 32768;
/// Upper bound applied to the smoothing time constant.
pub const MAX_SMOOTHING: f32 = 0.95;

/// Spectrum analysis settings consumed at construction.
///
/// Only `smoothing_time_constant` may change afterwards, through
/// [`crate::analysis::AudioAnalyzer::set_smoothing`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerConfig {
    /// Transform size in samples (power of two)
    pub fft_size: usize,
    /// Inter-frame magnitude smoothing in `[0, 0.95]`
    pub smoothing_time_constant: f32,
    /// Level mapped to byte 0
    pub min_decibels: f32,
    /// Level mapped to byte 255
    pub max_decibels: f32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            smoothing_time_constant: 0.8,
            min_decibels: -90.0,
            max_decibels: -10.0,
        }
    }
}

impl AnalyzerConfig {
    /// Number of frequency bins produced per sample (`fft_size / 2`).
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Check the config and return it with the smoothing constant clamped.
    pub fn validated(mut self) -> AudioResult<Self> {
        if !self.fft_size.is_power_of_two()
            || self.fft_size < MIN_FFT_SIZE
            || self.fft_size > MAX_FFT_SIZE
        {
            return Err(AudioError::InvalidConfig(format!(
                "fft size must be a power of two between {} and {}, got {}",
                MIN_FFT_SIZE, MAX_FFT_SIZE, self.fft_size
            )));
        }

        if !self.min_decibels.is_finite() || !self.max_decibels.is_finite() {
            return Err(AudioError::InvalidConfig(
                "decibel bounds must be finite".to_string(),
            ));
        }

        if self.min_decibels >= self.max_decibels {
            return Err(AudioError::InvalidConfig(format!(
                "min decibels ({}) must be below max decibels ({})",
                self.min_decibels, self.max_decibels
            )));
        }

        self.smoothing_time_constant = clamp_smoothing(self.smoothing_time_constant);
        Ok(self)
    }
}

/// Clamp a smoothing time constant into `[0, 0.95]`; NaN becomes 0.
pub fn clamp_smoothing(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, MAX_SMOOTHING)
    }
}
