// src/audio/context.rs
//! The audio processing context: output device, power state and analysis tap.

use std::fmt;

use rodio::{OutputStream, OutputStreamHandle};
use tracing::{debug, info};

use super::tap::SampleTap;
use crate::error::{AudioError, AudioResult};

/// Sample rate reported while no source is bound.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Power state of an [`AudioContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Suspended,
    Running,
    Closed,
}

impl fmt::Display for ContextState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContextState::Suspended => "suspended",
            ContextState::Running => "running",
            ContextState::Closed => "closed",
        };
        write!(f, "{}", s)
    }
}

/// Audible output device. The stream must stay alive for sinks to play.
struct OutputDevice {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

/// Owns the live audio-graph resources shared by every source binding.
///
/// Starts suspended; connecting a source resumes it. `close` releases the
/// output device and is safe to call repeatedly.
pub struct AudioContext {
    state: ContextState,
    sample_rate: u32,
    tap: SampleTap,
    output: Option<OutputDevice>,
}

impl AudioContext {
    /// Open the default output device.
    pub fn open(tap_capacity: usize) -> AudioResult<Self> {
        let (stream, handle) = OutputStream::try_default()?;
        info!("Audio output opened");
        Ok(Self {
            output: Some(OutputDevice {
                _stream: stream,
                handle,
            }),
            ..Self::headless(tap_capacity)
        })
    }

    /// A context without an audible destination. Stream sources and injected
    /// samples still reach the analysis tap.
    pub fn headless(tap_capacity: usize) -> Self {
        Self {
            state: ContextState::Suspended,
            sample_rate: DEFAULT_SAMPLE_RATE,
            tap: SampleTap::new(tap_capacity),
            output: None,
        }
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    pub fn tap(&self) -> &SampleTap {
        &self.tap
    }

    /// Handle for audible playback, if an output device is open.
    pub fn output_handle(&self) -> Option<&OutputStreamHandle> {
        self.output.as_ref().map(|device| &device.handle)
    }

    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub(crate) fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = if sample_rate > 0 {
            sample_rate
        } else {
            DEFAULT_SAMPLE_RATE
        };
    }

    /// Fail if the context has been closed.
    pub fn ensure_open(&self) -> AudioResult<()> {
        if self.state == ContextState::Closed {
            return Err(AudioError::ContextClosed);
        }
        Ok(())
    }

    /// Resume processing if suspended. Returns true if the state changed.
    pub fn resume(&mut self) -> bool {
        if self.state != ContextState::Suspended {
            return false;
        }
        self.state = ContextState::Running;
        self.tap.set_open(true);
        debug!("Audio context resumed");
        true
    }

    /// Suspend processing if running. Returns true if the state changed.
    pub fn suspend(&mut self) -> bool {
        if self.state != ContextState::Running {
            return false;
        }
        self.state = ContextState::Suspended;
        self.tap.set_open(false);
        debug!("Audio context suspended");
        true
    }

    /// Release the output device. Idempotent.
    pub fn close(&mut self) {
        if self.state == ContextState::Closed {
            return;
        }
        self.tap.set_open(false);
        self.tap.clear();
        self.output = None;
        self.state = ContextState::Closed;
        self.sample_rate = DEFAULT_SAMPLE_RATE;
        info!("Audio context closed");
    }
}
