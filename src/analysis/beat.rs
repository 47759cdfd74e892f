// src/analysis/beat.rs
//! Spectral-flux onset detection with a decaying adaptive threshold.

use std::collections::VecDeque;

use tracing::trace;

/// Threshold multiplier at construction.
pub const INITIAL_THRESHOLD: f32 = 1.3;
/// Per-call threshold decay on non-firing calls.
pub const THRESHOLD_DECAY: f32 = 0.98;
/// Lowest threshold reachable by decay.
pub const THRESHOLD_FLOOR: f32 = 1.15;
/// Flux samples kept for the rolling baseline (about one second at 60 Hz).
pub const FLUX_HISTORY_LEN: usize = 43;

/// Adaptive threshold and single-pulse latch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatState {
    pub threshold: f32,
    pub detected: bool,
}

impl Default for BeatState {
    fn default() -> Self {
        Self {
            threshold: INITIAL_THRESHOLD,
            detected: false,
        }
    }
}

/// Bounded FIFO of recent flux values.
#[derive(Debug, Clone)]
pub struct FluxHistory {
    values: VecDeque<f32>,
    capacity: usize,
}

impl Default for FluxHistory {
    fn default() -> Self {
        Self::with_capacity(FLUX_HISTORY_LEN)
    }
}

impl FluxHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a value, evicting the oldest when full.
    pub fn push(&mut self, flux: f32) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(flux);
    }

    /// Mean of the stored values, 0 when empty.
    pub fn average(&self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f32>() / self.values.len() as f32
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Beat detector over per-call band snapshots.
///
/// A beat fires when the positive flux exceeds `threshold` times the rolling
/// average and the previous call did not fire. Non-firing calls decay the
/// threshold toward [`THRESHOLD_FLOOR`] and re-arm the latch. Nothing raises
/// the threshold again short of a new detector.
#[derive(Debug, Clone, Default)]
pub struct BeatDetector {
    previous: Vec<f32>,
    history: FluxHistory,
    state: BeatState,
}

impl BeatDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one band snapshot; returns true on a beat onset.
    pub fn detect(&mut self, bands: &[f32]) -> bool {
        if self.previous.len() != bands.len() {
            self.previous.resize(bands.len(), 0.0);
        }

        let mut flux = 0.0;
        for (prev, &current) in self.previous.iter_mut().zip(bands) {
            let diff = current - *prev;
            if diff > 0.0 {
                flux += diff;
            }
            *prev = current;
        }

        self.history.push(flux);
        let avg_flux = self.history.average();

        let beat = flux > avg_flux * self.state.threshold && !self.state.detected;

        if beat {
            self.state.detected = true;
        } else {
            self.state.threshold = (self.state.threshold * THRESHOLD_DECAY).max(THRESHOLD_FLOOR);
            self.state.detected = false;
        }

        trace!(
            "flux={:.4} avg={:.4} threshold={:.3} beat={}",
            flux,
            avg_flux,
            self.state.threshold,
            beat
        );
        beat
    }

    pub fn state(&self) -> BeatState {
        self.state
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
