// src/audio/mod.rs
//! Audio module - live sources, the processing context, and the analysis tap.

pub mod connection;
pub mod context;
pub mod metadata;
pub mod source;
pub mod tap;

// Re-export commonly used types
pub use connection::{SourceConnections, SourceKind};
pub use context::{AudioContext, ContextState, DEFAULT_SAMPLE_RATE};
pub use metadata::TrackInfo;
pub use source::{FileElement, MicrophoneStream, Route, SourceNode};
pub use tap::{SampleCapture, SampleTap};
