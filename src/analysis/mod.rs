// src/analysis/mod.rs
//! Real-time analysis pipeline: spectrum, bands, ranges and beats.

pub mod bands;
pub mod beat;
pub mod ranges;
pub mod spectrum;

pub use bands::{BandAggregator, BAND_COUNT};
pub use beat::{BeatDetector, BeatState, FluxHistory};
pub use ranges::{AudioBands, RangeMapper};
pub use spectrum::SpectrumSampler;

use std::time::Duration;

use tracing::{debug, warn};

use crate::audio::{AudioContext, ContextState, SampleTap, SourceConnections, SourceKind, SourceNode};
use crate::config::AnalyzerConfig;
use crate::error::AudioResult;

/// Everything a host needs for one visual frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnalysisFrame {
    pub frequency_bands: [f32; BAND_COUNT],
    pub audio_bands: AudioBands,
    pub beat: bool,
}

/// Owns the audio context, the active source binding and all analysis state.
///
/// Every query advances the stateful stages by exactly one tick, whatever the
/// wall-clock time since the previous query. Not meant to be shared between
/// callers. Dropping the analyzer disposes it.
pub struct AudioAnalyzer {
    config: AnalyzerConfig,
    context: AudioContext,
    connections: SourceConnections,
    sampler: SpectrumSampler,
    aggregator: BandAggregator,
    mapper: RangeMapper,
    detector: BeatDetector,
}

/// The tap feeding the sampler, or `None` while nothing is bound.
fn bound_tap<'a>(connections: &SourceConnections, context: &'a AudioContext) -> Option<&'a SampleTap> {
    connections.is_connected().then(|| context.tap())
}

impl AudioAnalyzer {
    /// Validate `config` and open the default output device.
    ///
    /// Without an output device the analyzer still works for stream sources;
    /// element sources will fail to connect.
    pub fn new(config: AnalyzerConfig) -> AudioResult<Self> {
        let config = config.validated()?;
        let context = match AudioContext::open(config.fft_size) {
            Ok(context) => context,
            Err(e) => {
                warn!("No audio output, continuing analysis-only: {}", e);
                AudioContext::headless(config.fft_size)
            }
        };
        Self::with_context(config, context)
    }

    /// Build on an existing context (headless hosts and tests).
    pub fn with_context(config: AnalyzerConfig, context: AudioContext) -> AudioResult<Self> {
        let config = config.validated()?;
        debug!(
            "Analyzer fft_size={} smoothing={} dB=[{}, {}]",
            config.fft_size, config.smoothing_time_constant, config.min_decibels, config.max_decibels
        );
        Ok(Self {
            sampler: SpectrumSampler::new(&config),
            config,
            context,
            connections: SourceConnections::new(),
            aggregator: BandAggregator::new(),
            mapper: RangeMapper::new(),
            detector: BeatDetector::new(),
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Resample and return `n` smoothed bands.
    pub fn frequency_bands(&mut self, n: usize) -> &[f32] {
        let input = bound_tap(&self.connections, &self.context);
        let spectrum = self.sampler.sample(input);
        self.aggregator.update(spectrum, n)
    }

    fn sample_bands(&mut self) -> [f32; BAND_COUNT] {
        let mut bands = [0.0; BAND_COUNT];
        bands.copy_from_slice(self.frequency_bands(BAND_COUNT));
        bands
    }

    /// Resample and map the eight bands onto perceptual ranges.
    pub fn audio_bands(&mut self) -> AudioBands {
        let bands = self.sample_bands();
        self.mapper.map(&bands)
    }

    /// Advance the volume EMA from the current bands without resampling.
    pub fn volume(&mut self) -> f32 {
        self.mapper.update_volume(self.aggregator.values())
    }

    /// Resample and run one beat-detection step.
    pub fn detect_beat(&mut self) -> bool {
        let bands = self.sample_bands();
        self.detector.detect(&bands)
    }

    /// One tick: a single spectrum sample drives bands, ranges and beat.
    pub fn poll(&mut self) -> AnalysisFrame {
        let frequency_bands = self.sample_bands();
        let audio_bands = self.mapper.map(&frequency_bands);
        let beat = self.detector.detect(&frequency_bands);
        AnalysisFrame {
            frequency_bands,
            audio_bands,
            beat,
        }
    }

    /// Resample and return the raw byte spectrum.
    pub fn frequency_data(&mut self) -> &[u8] {
        let input = bound_tap(&self.connections, &self.context);
        self.sampler.sample(input)
    }

    /// Latest time-domain samples as bytes centred on 128.
    pub fn waveform_data(&self) -> Vec<u8> {
        self.sampler
            .waveform(bound_tap(&self.connections, &self.context))
    }

    /// Mean normalized level between two frequencies, 0 for an empty window.
    pub fn frequency_range(&mut self, min_hz: f32, max_hz: f32) -> f32 {
        let nyquist = self.context.sample_rate() as f32 / 2.0;
        let input = bound_tap(&self.connections, &self.context);
        let spectrum = self.sampler.sample(input);
        range_level(spectrum, min_hz, max_hz, nyquist)
    }

    /// Set the spectrum smoothing, clamped to `[0, 0.95]`.
    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.sampler.set_smoothing(smoothing);
        self.config.smoothing_time_constant = self.sampler.smoothing();
        debug!("Smoothing set to {}", self.config.smoothing_time_constant);
    }

    pub fn smoothing(&self) -> f32 {
        self.sampler.smoothing()
    }

    /// Resume the context and the bound source. Returns true if the state changed.
    pub fn resume(&mut self) -> bool {
        let changed = self.context.resume();
        if changed {
            self.connections.set_paused(false);
        }
        changed
    }

    /// Suspend the context and pause the bound source.
    pub fn suspend(&mut self) -> bool {
        let changed = self.context.suspend();
        if changed {
            self.connections.set_paused(true);
        }
        changed
    }

    pub fn state(&self) -> ContextState {
        self.context.state()
    }

    /// Sample rate of the bound source, or the default when unbound.
    pub fn sample_rate(&self) -> u32 {
        self.context.sample_rate()
    }

    /// Bind a decoded element (analysis and audible output).
    pub fn connect_element(&mut self, node: Box<dyn SourceNode>) -> AudioResult<()> {
        self.connections.connect_element(&mut self.context, node)
    }

    /// Bind a live stream (analysis only).
    pub fn connect_stream(&mut self, node: Box<dyn SourceNode>) -> AudioResult<()> {
        self.connections.connect_stream(&mut self.context, node)
    }

    /// Sever the active source. Safe to call with nothing bound.
    pub fn disconnect_source(&mut self) {
        self.connections.disconnect(&mut self.context);
    }

    pub fn active_source(&self) -> Option<SourceKind> {
        self.connections.active()
    }

    pub fn source_label(&self) -> Option<&str> {
        self.connections.label()
    }

    /// Audible gain of an element source; streams ignore it.
    pub fn set_output_gain(&mut self, gain: f32) {
        self.connections.set_gain(gain);
    }

    /// Jump the bound source to `position`; a finished file plays again.
    pub fn seek_source(&mut self, position: Duration) -> AudioResult<()> {
        self.connections.seek(position)
    }

    pub fn source_position(&self) -> Option<Duration> {
        self.connections.position()
    }

    /// True when a finite source (a file) has played to the end.
    pub fn source_finished(&self) -> bool {
        self.connections.is_finished()
    }

    pub fn beat_state(&self) -> BeatState {
        self.detector.state()
    }

    /// Shared tap feeding the sampler; hosts may push samples into it directly.
    pub fn tap(&self) -> &SampleTap {
        self.context.tap()
    }

    /// Release the source and the audio context. Idempotent.
    pub fn dispose(&mut self) {
        if self.context.state() == ContextState::Closed && !self.connections.is_connected() {
            return;
        }
        self.connections.disconnect(&mut self.context);
        self.context.close();
        debug!("Analyzer disposed");
    }
}

impl Drop for AudioAnalyzer {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Mean of the bins covering `[min_hz, max_hz]`, normalized to `[0, 1]`.
///
/// The window runs from `floor(min / nyquist * len)` to
/// `ceil(max / nyquist * len)` inclusive, cut at the last bin.
pub fn range_level(spectrum: &[u8], min_hz: f32, max_hz: f32, nyquist: f32) -> f32 {
    let len = spectrum.len();
    if len == 0 || nyquist <= 0.0 || !min_hz.is_finite() || !max_hz.is_finite() {
        return 0.0;
    }

    let lo = ((min_hz / nyquist) * len as f32).floor().max(0.0) as usize;
    let hi = ((max_hz / nyquist) * len as f32).ceil();
    if hi < 0.0 {
        return 0.0;
    }
    let hi = (hi as usize).min(len - 1);
    if lo > hi {
        return 0.0;
    }

    let window = &spectrum[lo..=hi];
    let sum: u32 = window.iter().map(|&b| b as u32).sum();
    sum as f32 / window.len() as f32 / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::DEFAULT_SAMPLE_RATE;

    fn headless() -> AudioAnalyzer {
        let config = AnalyzerConfig::default();
        let context = AudioContext::headless(config.fft_size);
        AudioAnalyzer::with_context(config, context).unwrap()
    }

    #[test]
    fn test_unbound_analyzer_is_silent() {
        let mut analyzer = headless();
        // Samples in the tap are ignored while nothing is bound
        analyzer.tap().push_slice(&[0.9; 2048]);

        assert_eq!(analyzer.audio_bands(), AudioBands::default());
        assert!(!analyzer.detect_beat());
        assert!(analyzer.frequency_data().iter().all(|&b| b == 0));
        assert_eq!(analyzer.poll(), AnalysisFrame::default());
        assert_eq!(analyzer.sample_rate(), DEFAULT_SAMPLE_RATE);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = AnalyzerConfig {
            fft_size: 1000,
            ..Default::default()
        };
        let context = AudioContext::headless(1000);
        assert!(AudioAnalyzer::with_context(config, context).is_err());
    }

    #[test]
    fn test_set_smoothing_clamps_and_updates_config() {
        let mut analyzer = headless();
        analyzer.set_smoothing(1.5);
        assert_eq!(analyzer.smoothing(), 0.95);
        assert_eq!(analyzer.config().smoothing_time_constant, 0.95);
        analyzer.set_smoothing(0.0);
        assert_eq!(analyzer.smoothing(), 0.0);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut analyzer = headless();
        analyzer.dispose();
        analyzer.dispose();
        assert_eq!(analyzer.state(), ContextState::Closed);
        analyzer.disconnect_source();
        assert!(!analyzer.poll().beat);
    }

    #[test]
    fn test_range_level_window() {
        let mut spectrum = vec![0u8; 1024];
        spectrum[..4].fill(255);

        // 0..=4 at nyquist 1024 Hz with 1024 bins: four full bins and one empty
        let level = range_level(&spectrum, 0.0, 4.0, 1024.0);
        assert!((level - 0.8).abs() < 1e-6);

        assert_eq!(range_level(&spectrum, 2000.0, 3000.0, 1024.0), 0.0);
        assert_eq!(range_level(&spectrum, 500.0, 100.0, 1024.0), 0.0);
        assert_eq!(range_level(&[], 0.0, 100.0, 1024.0), 0.0);
        assert_eq!(range_level(&spectrum, f32::NAN, 100.0, 1024.0), 0.0);
    }

    #[test]
    fn test_range_level_clamps_to_last_bin() {
        let spectrum = vec![255u8; 16];
        let level = range_level(&spectrum, 0.0, 1_000_000.0, 100.0);
        assert!((level - 1.0).abs() < 1e-6);
    }
}
