// src/app/uniforms.rs
//! Visual parameters driven by analysis frames.

use std::fmt;

use crate::analysis::{AnalysisFrame, BAND_COUNT};

/// Scale applied on a beat.
pub const PULSE_PEAK: f32 = 1.1;
/// Per-frame decay of the pulse back toward 1.
pub const PULSE_DECAY: f32 = 0.98;

/// Named sets of user multipliers and smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    #[default]
    Default,
    Energetic,
    Ambient,
    Intense,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Default,
        Preset::Energetic,
        Preset::Ambient,
        Preset::Intense,
    ];

    pub fn settings(self) -> VisualSettings {
        match self {
            Preset::Default => VisualSettings::default(),
            Preset::Energetic => VisualSettings {
                sensitivity: 2.0,
                smoothing: 0.6,
                bass_boost: 2.0,
                mid_boost: 1.5,
                treble_boost: 1.2,
            },
            Preset::Ambient => VisualSettings {
                sensitivity: 0.5,
                smoothing: 0.9,
                bass_boost: 0.8,
                mid_boost: 1.0,
                treble_boost: 1.2,
            },
            Preset::Intense => VisualSettings {
                sensitivity: 3.0,
                smoothing: 0.5,
                bass_boost: 2.5,
                mid_boost: 2.0,
                treble_boost: 1.5,
            },
        }
    }

    /// The preset after this one, wrapping around.
    pub fn next(self) -> Preset {
        let idx = Preset::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Preset::ALL[(idx + 1) % Preset::ALL.len()]
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Preset::Default => "default",
            Preset::Energetic => "energetic",
            Preset::Ambient => "ambient",
            Preset::Intense => "intense",
        };
        write!(f, "{}", s)
    }
}

/// User-tunable multipliers applied on top of the analysis output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualSettings {
    pub sensitivity: f32,
    /// Spectrum smoothing handed to the analyzer when the preset is applied
    pub smoothing: f32,
    pub bass_boost: f32,
    pub mid_boost: f32,
    pub treble_boost: f32,
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            sensitivity: 1.0,
            smoothing: 0.8,
            bass_boost: 1.0,
            mid_boost: 1.0,
            treble_boost: 1.0,
        }
    }
}

/// Parameters consumed by the renderer each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactiveUniforms {
    pub audio_data: [f32; BAND_COUNT],
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
    pub volume: f32,
    /// Scale that jumps on a beat and relaxes toward 1
    pub pulse: f32,
    pub settings: VisualSettings,
}

impl Default for ReactiveUniforms {
    fn default() -> Self {
        Self::new(VisualSettings::default())
    }
}

impl ReactiveUniforms {
    pub fn new(settings: VisualSettings) -> Self {
        Self {
            audio_data: [0.0; BAND_COUNT],
            bass: 0.0,
            mid: 0.0,
            treble: 0.0,
            volume: 0.0,
            pulse: 1.0,
            settings,
        }
    }

    /// Take the values of a freshly polled frame.
    pub fn apply(&mut self, frame: &AnalysisFrame) {
        let s = self.settings;
        for (slot, &band) in self.audio_data.iter_mut().zip(&frame.frequency_bands) {
            *slot = band * s.sensitivity;
        }
        self.bass = frame.audio_bands.bass * s.bass_boost * s.sensitivity;
        self.mid = frame.audio_bands.mid * s.mid_boost * s.sensitivity;
        self.treble = frame.audio_bands.treble * s.treble_boost * s.sensitivity;
        self.volume = frame.audio_bands.volume;
        if frame.beat {
            self.pulse = PULSE_PEAK;
        }
    }

    /// Relax the pulse once. Called every rendered frame, polled or not.
    pub fn decay(&mut self) {
        if self.pulse > 1.0 {
            self.pulse = (self.pulse * PULSE_DECAY).max(1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AudioBands;

    fn frame(beat: bool) -> AnalysisFrame {
        AnalysisFrame {
            frequency_bands: [0.5; BAND_COUNT],
            audio_bands: AudioBands {
                bass: 0.4,
                mid: 0.3,
                treble: 0.2,
                volume: 0.25,
                ..Default::default()
            },
            beat,
        }
    }

    #[test]
    fn test_multipliers_apply() {
        let mut uniforms = ReactiveUniforms::new(Preset::Energetic.settings());
        uniforms.apply(&frame(false));

        assert!(uniforms.audio_data.iter().all(|&v| (v - 1.0).abs() < 1e-6));
        assert!((uniforms.bass - 1.6).abs() < 1e-6);
        assert!((uniforms.mid - 0.9).abs() < 1e-6);
        assert!((uniforms.treble - 0.48).abs() < 1e-6);
        assert_eq!(uniforms.volume, 0.25);
        assert_eq!(uniforms.pulse, 1.0);
    }

    #[test]
    fn test_pulse_jumps_and_relaxes_to_one() {
        let mut uniforms = ReactiveUniforms::default();
        uniforms.apply(&frame(true));
        assert_eq!(uniforms.pulse, PULSE_PEAK);

        uniforms.decay();
        assert!((uniforms.pulse - PULSE_PEAK * PULSE_DECAY).abs() < 1e-6);

        for _ in 0..100 {
            uniforms.decay();
        }
        assert_eq!(uniforms.pulse, 1.0);
    }

    #[test]
    fn test_preset_cycle() {
        assert_eq!(Preset::Default.next(), Preset::Energetic);
        assert_eq!(Preset::Intense.next(), Preset::Default);
        assert_eq!(Preset::Ambient.settings().smoothing, 0.9);
    }
}
