// src/analysis/bands.rs
//! Coarse energy bands with asymmetric smoothing.

/// Number of bands used by the range mapper and beat detector.
pub const BAND_COUNT: usize = 8;

/// EMA rate applied while a band is rising toward its target.
pub const ATTACK_RATE: f32 = 0.15;

/// EMA rate applied while a band is at or above its target.
///
/// Numerically faster than [`ATTACK_RATE`]; kept as tuned.
pub const DECAY_RATE: f32 = 0.25;

/// Reduces a byte spectrum to `n` equal-width bands, each smoothed across calls.
///
/// The first [`BAND_COUNT`] slots are the persistent state read by the range
/// mapper and the volume EMA. A query with fewer bands advances only its
/// leading slots and leaves the rest untouched. Bands past [`BAND_COUNT`]
/// are smoothed in a separate overflow buffer.
#[derive(Debug, Clone, Default)]
pub struct BandAggregator {
    smoothed: [f32; BAND_COUNT],
    overflow: Vec<f32>,
    output: Vec<f32>,
}

impl BandAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `spectrum` into `n` smoothed bands and return them.
    ///
    /// Each band covers `floor(len / n)` bins; trailing bins past
    /// `n * floor(len / n)` are ignored. Empty bands have a target of 0.
    pub fn update(&mut self, spectrum: &[u8], n: usize) -> &[f32] {
        let extra = n.saturating_sub(BAND_COUNT);
        if self.overflow.len() < extra {
            self.overflow.resize(extra, 0.0);
        }

        let band_size = if n == 0 { 0 } else { spectrum.len() / n };
        self.output.clear();

        for i in 0..n {
            let target = if band_size == 0 {
                0.0
            } else {
                let start = i * band_size;
                let sum: u32 = spectrum[start..start + band_size]
                    .iter()
                    .map(|&b| b as u32)
                    .sum();
                sum as f32 / band_size as f32 / 255.0
            };

            let slot = match self.smoothed.get_mut(i) {
                Some(slot) => slot,
                None => &mut self.overflow[i - BAND_COUNT],
            };
            let rate = if target > *slot { ATTACK_RATE } else { DECAY_RATE };
            *slot += (target - *slot) * rate;
            self.output.push(*slot);
        }

        &self.output
    }

    /// The persistent bands without advancing them.
    pub fn values(&self) -> &[f32; BAND_COUNT] {
        &self.smoothed
    }

    pub fn reset(&mut self) {
        self.smoothed = [0.0; BAND_COUNT];
        self.overflow.clear();
        self.output.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum_with_first_band_full() -> Vec<u8> {
        let mut spectrum = vec![0u8; 1024];
        spectrum[..256].fill(255);
        spectrum
    }

    #[test]
    fn test_first_call_applies_attack_once() {
        let mut agg = BandAggregator::new();
        let bands = agg.update(&spectrum_with_first_band_full(), 8);

        assert_eq!(bands.len(), 8);
        // Bins 0..128 belong to band 0, 128..256 to band 1
        assert!((bands[0] - 0.15).abs() < 1e-6);
        assert!((bands[1] - 0.15).abs() < 1e-6);
        assert!(bands[2..].iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_wide_band_target_of_one() {
        // With n = 4 the first band spans exactly bins 0..256
        let mut agg = BandAggregator::new();
        let bands = agg.update(&spectrum_with_first_band_full(), 4);
        assert!((bands[0] - 0.15).abs() < 1e-6);
        assert_eq!(bands[1], 0.0);
    }

    #[test]
    fn test_converges_without_overshoot() {
        let mut agg = BandAggregator::new();
        let spectrum = vec![128u8; 1024];
        let target = 128.0 / 255.0;

        let mut previous = 0.0;
        for _ in 0..200 {
            let value = agg.update(&spectrum, 8)[0];
            assert!(value > previous || (value - target).abs() < 1e-6);
            assert!(value <= target + 1e-6);
            previous = value;
        }
        assert!((previous - target).abs() < 1e-4);
    }

    #[test]
    fn test_decay_uses_decay_rate() {
        let mut agg = BandAggregator::new();
        let full = vec![255u8; 1024];
        for _ in 0..200 {
            agg.update(&full, 8);
        }
        let high = agg.values()[0];
        let after = agg.update(&vec![0u8; 1024], 8)[0];
        assert!((after - high * (1.0 - DECAY_RATE)).abs() < 1e-6);
    }

    #[test]
    fn test_remainder_bins_are_dropped() {
        // 10 bins into 3 bands: width 3, bin 9 ignored
        let mut spectrum = vec![0u8; 10];
        spectrum[9] = 255;
        let mut agg = BandAggregator::new();
        assert!(agg.update(&spectrum, 3).iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_degenerate_band_counts() {
        let mut agg = BandAggregator::new();
        assert!(agg.update(&[255u8; 4], 0).is_empty());

        let bands = agg.update(&[255u8; 4], 16);
        assert_eq!(bands.len(), 16);
        assert!(bands.iter().all(|b| b.is_finite() && *b == 0.0));
    }

    #[test]
    fn test_wide_query_keeps_base_slots() {
        let mut agg = BandAggregator::new();
        agg.update(&vec![255u8; 1024], 8);
        let bands = agg.update(&vec![255u8; 1024], 10);
        assert_eq!(bands.len(), 10);
        // Slot 0 attacked twice, overflow slot 9 once
        assert!(bands[0] > bands[9]);
        assert!((bands[9] - 0.15).abs() < 1e-6);
        assert_eq!(agg.values().len(), BAND_COUNT);
    }

    #[test]
    fn test_narrow_query_leaves_upper_bands_alone() {
        let mut agg = BandAggregator::new();
        let full = vec![255u8; 1024];
        for _ in 0..50 {
            agg.update(&full, 8);
        }
        let before = *agg.values();
        assert!(before[7] > 0.99);

        let narrow = agg.update(&full, 4);
        assert_eq!(narrow.len(), 4);
        assert_eq!(agg.values()[4..], before[4..]);

        let after = agg.update(&full, 8)[7];
        assert!(after >= before[7], "band 7 fell from {} to {}", before[7], after);
    }

    #[test]
    fn test_reset_clears_all_slots() {
        let mut agg = BandAggregator::new();
        agg.update(&vec![255u8; 1024], 12);
        agg.reset();
        assert_eq!(agg.values(), &[0.0; BAND_COUNT]);
        assert!(agg.update(&vec![0u8; 1024], 12).iter().all(|&b| b == 0.0));
    }
}
