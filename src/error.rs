// src/error.rs
//! Error types for the analysis pipeline and its audio sources.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the analyzer, its context, and source connections.
///
/// Per-frame queries never fail; only construction and source changes do.
#[derive(Error, Debug)]
pub enum AudioError {
    /// Analyzer configuration rejected at construction
    #[error("Invalid analyzer config: {0}")]
    InvalidConfig(String),

    /// The audio context was already disposed
    #[error("Audio context is closed")]
    ContextClosed,

    /// No audible output device could be opened
    #[error("No audio output device available")]
    NoOutputDevice,

    /// Input device missing or access refused
    #[error("Audio input unavailable: {0}")]
    InputUnavailable(String),

    /// The chosen file is not an audio file
    #[error("Not an audio file: {}", .0.display())]
    UnsupportedFile(PathBuf),

    /// Decoder failure for an element source
    #[error("Decode error: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),

    /// Output stream could not be opened
    #[error("Output stream error: {0}")]
    Output(#[from] rodio::StreamError),

    /// Sink creation failed on the output stream
    #[error("Playback error: {0}")]
    Playback(#[from] rodio::PlayError),

    /// The element's decoder cannot jump to the requested position
    #[error("Seek error: {0}")]
    Seek(#[from] rodio::source::SeekError),

    /// Input stream build/play failure
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<cpal::DevicesError> for AudioError {
    fn from(err: cpal::DevicesError) -> Self {
        AudioError::InputUnavailable(format!("failed to enumerate devices: {}", err))
    }
}

impl From<cpal::DeviceNameError> for AudioError {
    fn from(err: cpal::DeviceNameError) -> Self {
        AudioError::InputUnavailable(format!("failed to get device name: {}", err))
    }
}

impl From<cpal::DefaultStreamConfigError> for AudioError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        AudioError::InputUnavailable(format!("failed to get default input config: {}", err))
    }
}

impl From<cpal::BuildStreamError> for AudioError {
    fn from(err: cpal::BuildStreamError) -> Self {
        AudioError::Stream(format!("failed to build input stream: {}", err))
    }
}

impl From<cpal::PlayStreamError> for AudioError {
    fn from(err: cpal::PlayStreamError) -> Self {
        AudioError::Stream(format!("failed to start input stream: {}", err))
    }
}

/// Result type for analyzer and source operations
pub type AudioResult<T> = Result<T, AudioError>;
