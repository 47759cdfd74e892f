// src/app/throttle.rs
//! Query the analyzer on every Nth rendered frame.

/// Frame counter gating analyzer queries.
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    skip: u32,
    frame: u64,
}

impl FrameThrottle {
    /// `skip` of 0 behaves like 1 (query every frame).
    pub fn new(skip: u32) -> Self {
        Self {
            skip: skip.max(1),
            frame: 0,
        }
    }

    /// Advance one frame; true when this frame should query.
    pub fn tick(&mut self) -> bool {
        self.frame += 1;
        self.frame % self.skip as u64 == 0
    }

    pub fn skip(&self) -> u32 {
        self.skip
    }

    pub fn frames(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_other_frame() {
        let mut throttle = FrameThrottle::new(2);
        let ticks: Vec<bool> = (0..6).map(|_| throttle.tick()).collect();
        assert_eq!(ticks, vec![false, true, false, true, false, true]);
    }

    #[test]
    fn test_zero_skip_queries_every_frame() {
        let mut throttle = FrameThrottle::new(0);
        assert_eq!(throttle.skip(), 1);
        assert!((0..5).all(|_| throttle.tick()));
        assert_eq!(throttle.frames(), 5);
    }
}
