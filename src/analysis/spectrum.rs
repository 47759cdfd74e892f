// src/analysis/spectrum.rs
//! FFT spectrum sampling into byte magnitudes.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::audio::SampleTap;
use crate::config::analyzer::clamp_smoothing;
use crate::config::AnalyzerConfig;

/// Spectrum sampler producing `fft_size / 2` unsigned byte magnitudes.
///
/// Owns a single output buffer that is refreshed in place; the slice returned
/// by [`SpectrumSampler::sample`] is only valid until the next call.
pub struct SpectrumSampler {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    min_decibels: f32,
    max_decibels: f32,
    /// Inter-frame magnitude smoothing (live-mutable)
    smoothing: f32,
    /// Blackman window coefficients
    window: Vec<f32>,
    /// Latest time-domain samples
    time_buffer: Vec<f32>,
    fft_buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    /// Smoothed linear magnitudes carried between samples
    magnitudes: Vec<f32>,
    /// Byte spectrum handed out to callers
    bytes: Vec<u8>,
}

impl SpectrumSampler {
    /// Create a sampler for a validated config.
    pub fn new(config: &AnalyzerConfig) -> Self {
        let fft_size = config.fft_size;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch_len = fft.get_inplace_scratch_len();
        let bin_count = fft_size / 2;

        Self {
            fft,
            fft_size,
            min_decibels: config.min_decibels,
            max_decibels: config.max_decibels,
            smoothing: clamp_smoothing(config.smoothing_time_constant),
            window: blackman_window(fft_size),
            time_buffer: vec![0.0; fft_size],
            fft_buffer: vec![Complex::new(0.0, 0.0); fft_size],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            magnitudes: vec![0.0; bin_count],
            bytes: vec![0; bin_count],
        }
    }

    pub fn bin_count(&self) -> usize {
        self.bytes.len()
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    /// Update the smoothing time constant, clamped to `[0, 0.95]`.
    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.smoothing = clamp_smoothing(smoothing);
    }

    /// Re-read the spectrum from `input`. `None` means no bound source: silence.
    pub fn sample(&mut self, input: Option<&SampleTap>) -> &[u8] {
        let Some(tap) = input else {
            self.magnitudes.fill(0.0);
            self.bytes.fill(0);
            return &self.bytes;
        };

        tap.copy_latest(&mut self.time_buffer);

        for ((slot, &sample), &w) in self
            .fft_buffer
            .iter_mut()
            .zip(&self.time_buffer)
            .zip(&self.window)
        {
            *slot = Complex::new(sample * w, 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.fft_buffer, &mut self.scratch);

        let scale = 1.0 / self.fft_size as f32;
        let tau = self.smoothing;
        let db_range = self.max_decibels - self.min_decibels;

        for ((smoothed, byte), bin) in self
            .magnitudes
            .iter_mut()
            .zip(self.bytes.iter_mut())
            .zip(&self.fft_buffer)
        {
            let magnitude = bin.norm() * scale;
            let mut next = tau * *smoothed + (1.0 - tau) * magnitude;
            if !next.is_finite() {
                next = 0.0;
            }
            *smoothed = next;

            // log10(0) is -inf, which clamps to byte 0
            let db = 20.0 * next.log10();
            let scaled = (255.0 / db_range * (db - self.min_decibels)).floor();
            *byte = if scaled.is_nan() {
                0
            } else {
                scaled.clamp(0.0, 255.0) as u8
            };
        }

        &self.bytes
    }

    /// Latest `fft_size / 2` time-domain samples as bytes centred on 128.
    pub fn waveform(&self, input: Option<&SampleTap>) -> Vec<u8> {
        let bin_count = self.bin_count();
        let Some(tap) = input else {
            return vec![128; bin_count];
        };

        let mut samples = vec![0.0f32; bin_count];
        tap.copy_latest(&mut samples);
        samples
            .iter()
            .map(|&x| (128.0 * (1.0 + x)).floor().clamp(0.0, 255.0) as u8)
            .collect()
    }
}

/// Blackman window with alpha = 0.16.
pub fn blackman_window(size: usize) -> Vec<f32> {
    const ALPHA: f32 = 0.16;
    let a0 = (1.0 - ALPHA) / 2.0;
    let a1 = 0.5;
    let a2 = ALPHA / 2.0;
    (0..size)
        .map(|i| {
            let t = i as f32 / size as f32;
            a0 - a1 * (2.0 * PI * t).cos() + a2 * (4.0 * PI * t).cos()
        })
        .collect()
}
