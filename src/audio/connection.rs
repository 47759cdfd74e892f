// src/audio/connection.rs
//! At most one live source bound to the analysis graph at a time.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::context::{AudioContext, DEFAULT_SAMPLE_RATE};
use super::source::{Route, SourceNode};
use crate::error::AudioResult;

/// How the active source is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Decoded element: analysis and audible output
    Element,
    /// Live stream (microphone): analysis only
    Stream,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceKind::Element => "element",
            SourceKind::Stream => "stream",
        };
        write!(f, "{}", s)
    }
}

struct Binding {
    kind: SourceKind,
    label: String,
    node: Box<dyn SourceNode>,
}

/// Source connection manager.
///
/// Binding a new source always severs the previous one first. A failed
/// connection leaves nothing bound.
#[derive(Default)]
pub struct SourceConnections {
    binding: Option<Binding>,
}

impl SourceConnections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a decoded element, routed to analysis and audible output.
    pub fn connect_element(
        &mut self,
        ctx: &mut AudioContext,
        node: Box<dyn SourceNode>,
    ) -> AudioResult<()> {
        self.connect(ctx, node, SourceKind::Element)
    }

    /// Bind a live stream, routed to analysis only.
    pub fn connect_stream(
        &mut self,
        ctx: &mut AudioContext,
        node: Box<dyn SourceNode>,
    ) -> AudioResult<()> {
        self.connect(ctx, node, SourceKind::Stream)
    }

    fn connect(
        &mut self,
        ctx: &mut AudioContext,
        mut node: Box<dyn SourceNode>,
        kind: SourceKind,
    ) -> AudioResult<()> {
        self.disconnect(ctx);
        ctx.ensure_open()?;

        let route = match kind {
            SourceKind::Element => Route::Audible(ctx.output_handle()),
            SourceKind::Stream => Route::AnalysisOnly,
        };

        // On failure the node is dropped here, releasing whatever it acquired
        let sample_rate = match node.connect(ctx.tap(), route) {
            Ok(rate) => rate,
            Err(e) => {
                warn!("Failed to connect {} source {}: {}", kind, node.label(), e);
                node.disconnect();
                return Err(e);
            }
        };

        ctx.set_sample_rate(sample_rate);
        ctx.resume();

        let label = node.label();
        info!("Connected {} source {} @ {} Hz", kind, label, sample_rate);
        self.binding = Some(Binding { kind, label, node });
        Ok(())
    }

    /// Sever the active binding, if any. Idempotent.
    pub fn disconnect(&mut self, ctx: &mut AudioContext) {
        if let Some(mut binding) = self.binding.take() {
            binding.node.disconnect();
            ctx.tap().clear();
            ctx.set_sample_rate(DEFAULT_SAMPLE_RATE);
            info!("Disconnected {} source {}", binding.kind, binding.label);
        }
    }

    /// Pause or resume delivery from the bound node.
    pub fn set_paused(&mut self, paused: bool) {
        if let Some(binding) = self.binding.as_mut() {
            binding.node.set_paused(paused);
            debug!("Source {} paused={}", binding.label, paused);
        }
    }

    /// Set the audible gain of the bound node.
    pub fn set_gain(&mut self, gain: f32) {
        if let Some(binding) = self.binding.as_mut() {
            binding.node.set_gain(gain);
        }
    }

    /// Move the bound node to `position`. Nothing bound is a no-op.
    pub fn seek(&mut self, position: Duration) -> AudioResult<()> {
        match self.binding.as_mut() {
            Some(binding) => {
                binding.node.seek(position)?;
                debug!("Source {} seeked to {:?}", binding.label, position);
                Ok(())
            }
            None => Ok(()),
        }
    }

    pub fn position(&self) -> Option<Duration> {
        self.binding.as_ref().and_then(|b| b.node.position())
    }

    /// True if the bound node has run out of audio.
    pub fn is_finished(&self) -> bool {
        self.binding.as_ref().is_some_and(|b| b.node.is_finished())
    }

    pub fn active(&self) -> Option<SourceKind> {
        self.binding.as_ref().map(|b| b.kind)
    }

    pub fn label(&self) -> Option<&str> {
        self.binding.as_ref().map(|b| b.label.as_str())
    }

    pub fn is_connected(&self) -> bool {
        self.binding.is_some()
    }
}
