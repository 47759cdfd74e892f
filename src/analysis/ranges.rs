// src/analysis/ranges.rs
//! Named perceptual ranges derived from the eight smoothed bands.

use super::bands::BAND_COUNT;

/// EMA rate for the overall volume.
pub const VOLUME_RATE: f32 = 0.1;

/// Ratio of `presence` reported as `brilliance`.
pub const BRILLIANCE_ESTIMATE: f32 = 0.8;

/// Perceptual ranges for one query. All fields are in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AudioBands {
    /// Mean of bands 0 and 1
    pub bass: f32,
    /// Band 2
    pub low_mid: f32,
    /// Mean of bands 3 and 4
    pub mid: f32,
    /// Band 5
    pub high_mid: f32,
    /// Band 6
    pub treble: f32,
    /// Band 7
    pub presence: f32,
    /// Approximation (`presence * 0.8`); not measured from its own bins.
    pub brilliance: f32,
    /// Smoothed mean of all bands
    pub volume: f32,
}

/// Maps bands onto [`AudioBands`] and keeps the running volume.
#[derive(Debug, Clone, Default)]
pub struct RangeMapper {
    volume: f32,
}

impl RangeMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map eight bands to ranges, advancing the volume EMA once.
    pub fn map(&mut self, bands: &[f32; BAND_COUNT]) -> AudioBands {
        let volume = self.update_volume(bands);
        AudioBands {
            bass: (bands[0] + bands[1]) / 2.0,
            low_mid: bands[2],
            mid: (bands[3] + bands[4]) / 2.0,
            high_mid: bands[5],
            treble: bands[6],
            presence: bands[7],
            brilliance: bands[7] * BRILLIANCE_ESTIMATE,
            volume,
        }
    }

    /// Advance the volume EMA toward the mean of `bands`. Empty input counts as 0.
    pub fn update_volume(&mut self, bands: &[f32]) -> f32 {
        let mean = if bands.is_empty() {
            0.0
        } else {
            bands.iter().sum::<f32>() / bands.len() as f32
        };
        self.volume += (mean - self.volume) * VOLUME_RATE;
        self.volume
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn reset(&mut self) {
        self.volume = 0.0;
    }
}
