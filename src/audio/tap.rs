// src/audio/tap.rs
//! Shared mono sample buffer between live sources and the spectrum sampler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use ringbuf::{traits::*, HeapRb};
use rodio::Source;

/// Circular buffer of the most recent mono samples fed by the bound source.
///
/// Cloning shares the same buffer. Writes are dropped while the tap is closed
/// (suspended context), matching a halted processing graph.
#[derive(Clone)]
pub struct SampleTap {
    buffer: Arc<Mutex<HeapRb<f32>>>,
    open: Arc<AtomicBool>,
}

impl SampleTap {
    /// Create a tap holding at most `capacity` samples. Starts closed.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(HeapRb::<f32>::new(capacity.max(1)))),
            open: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Accept or drop incoming samples.
    pub fn set_open(&self, open: bool) {
        self.open.store(open, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Append mono samples, overwriting the oldest when full.
    pub fn push_slice(&self, samples: &[f32]) {
        if !self.is_open() {
            return;
        }
        if let Ok(mut buf) = self.buffer.lock() {
            for &sample in samples {
                push_overwrite(&mut buf, sample);
            }
        }
    }

    /// Append interleaved frames, averaging each frame down to one sample.
    pub fn push_interleaved(&self, data: &[f32], channels: usize) {
        if channels <= 1 {
            self.push_slice(data);
            return;
        }
        if !self.is_open() {
            return;
        }
        if let Ok(mut buf) = self.buffer.lock() {
            for frame in data.chunks(channels) {
                let mono = frame.iter().sum::<f32>() / frame.len() as f32;
                push_overwrite(&mut buf, mono);
            }
        }
    }

    /// Copy the latest `out.len()` samples into `out`, oldest first.
    ///
    /// Missing history is zero-filled at the front. Returns how many real
    /// samples were copied.
    pub fn copy_latest(&self, out: &mut [f32]) -> usize {
        out.fill(0.0);
        let Ok(buf) = self.buffer.lock() else {
            // Poisoned by a panicking audio thread: treat as silence
            return 0;
        };
        let available = buf.occupied_len();
        let count = available.min(out.len());
        let skip = available - count;
        let offset = out.len() - count;
        for (slot, &sample) in out[offset..].iter_mut().zip(buf.iter().skip(skip)) {
            *slot = if sample.is_finite() { sample } else { 0.0 };
        }
        count
    }

    /// Number of buffered samples.
    pub fn len(&self) -> usize {
        self.buffer.lock().map(|buf| buf.occupied_len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all buffered samples.
    pub fn clear(&self) {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.clear();
        }
    }
}

fn push_overwrite(buf: &mut HeapRb<f32>, sample: f32) {
    // If buffer is full, pop the oldest sample to make room
    if buf.is_full() {
        let _ = buf.try_pop();
    }
    let _ = buf.try_push(sample);
}

/// A wrapper source that down-mixes samples into a [`SampleTap`] while passing them through.
pub struct SampleCapture<S> {
    source: S,
    tap: SampleTap,
    frame_sum: f32,
    frame_pos: u16,
}

impl<S> SampleCapture<S> {
    /// Create a new sample capture wrapper around an existing source.
    pub fn new(source: S, tap: SampleTap) -> Self {
        Self {
            source,
            tap,
            frame_sum: 0.0,
            frame_pos: 0,
        }
    }
}

impl<S> Iterator for SampleCapture<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let channels = self.source.channels().max(1);
        let sample = self.source.next()?;

        self.frame_sum += sample;
        self.frame_pos += 1;
        if self.frame_pos >= channels {
            self.tap.push_slice(&[self.frame_sum / channels as f32]);
            self.frame_sum = 0.0;
            self.frame_pos = 0;
        }

        Some(sample)
    }
}

impl<S> Source for SampleCapture<S>
where
    S: Source<Item = f32>,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.source.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.source.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.source.sample_rate()
    }

    fn total_duration(&self) -> Option<std::time::Duration> {
        self.source.total_duration()
    }

    fn try_seek(&mut self, pos: std::time::Duration) -> Result<(), rodio::source::SeekError> {
        self.source.try_seek(pos)?;
        // Drop the partial frame so channels stay aligned after the jump
        self.frame_sum = 0.0;
        self.frame_pos = 0;
        Ok(())
    }
}
