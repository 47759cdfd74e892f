// src/audio/source.rs
//! Live audio origins that can be bound to the analysis tap.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use rodio::{Decoder, OutputStreamHandle, Sink, Source};
use tracing::{debug, error, warn};

use super::metadata::{file_label, load_track_info, TrackInfo};
use super::tap::{SampleCapture, SampleTap};
use crate::error::{AudioError, AudioResult};
use crate::fs::detect_file_type;

/// Where a bound source's signal is allowed to go.
#[derive(Clone, Copy)]
pub enum Route<'a> {
    /// Analysis tap only. Live input never reaches the speakers.
    AnalysisOnly,
    /// Analysis tap and the audible destination (absent on headless contexts).
    Audible(Option<&'a OutputStreamHandle>),
}

impl Route<'_> {
    pub fn is_audible(&self) -> bool {
        matches!(self, Route::Audible(_))
    }
}

/// A live audio origin (decoded file, input device) feeding the tap.
pub trait SourceNode {
    /// Human-readable description for status display.
    fn label(&self) -> String;

    /// Start feeding `tap` (and the output, if routed). Returns the sample rate.
    fn connect(&mut self, tap: &SampleTap, route: Route<'_>) -> AudioResult<u32>;

    /// Stop feeding. Must be safe to call when not connected.
    fn disconnect(&mut self);

    /// Pause or resume delivery while the context is suspended.
    fn set_paused(&mut self, _paused: bool) {}

    /// Audible output gain. Analysis always sees the unscaled signal.
    fn set_gain(&mut self, _gain: f32) {}

    /// Playback position, for sources that have one.
    fn position(&self) -> Option<Duration> {
        None
    }

    /// True once a finite source has run out. Live input never finishes.
    fn is_finished(&self) -> bool {
        false
    }

    /// Jump to `position`. Sources without a timeline ignore it; a finished
    /// source starts over from there.
    fn seek(&mut self, _position: Duration) -> AudioResult<()> {
        Ok(())
    }
}

/// A decoded audio file played through the output device.
pub struct FileElement {
    path: PathBuf,
    info: TrackInfo,
    gain: f32,
    sink: Option<Sink>,
    tap: Option<SampleTap>,
}

impl FileElement {
    /// Validate that `path` is an audio file and read its track info.
    pub fn open(path: impl Into<PathBuf>) -> AudioResult<Self> {
        let path = path.into();
        let file_type = detect_file_type(&path)?;
        if !file_type.is_audio() {
            return Err(AudioError::UnsupportedFile(path));
        }

        let info = match load_track_info(&path) {
            Ok(info) => info,
            Err(e) => {
                warn!("No track info for {:?}: {}", path, e);
                TrackInfo {
                    title: file_label(&path),
                    ..Default::default()
                }
            }
        };

        Ok(Self {
            path,
            info,
            gain: 1.0,
            sink: None,
            tap: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn info(&self) -> &TrackInfo {
        &self.info
    }

    /// Decode the file from the start and queue it on `sink`.
    fn queue(&self, sink: &Sink, tap: &SampleTap) -> AudioResult<u32> {
        let file = File::open(&self.path)?;
        let source = Decoder::new(BufReader::new(file))?;
        let sample_rate = source.sample_rate();

        // Convert to f32 and wrap with sample capture
        let capturing = SampleCapture::new(source.convert_samples::<f32>(), tap.clone());
        sink.append(capturing);
        Ok(sample_rate)
    }
}

impl SourceNode for FileElement {
    fn label(&self) -> String {
        format!("file: {}", self.info.title)
    }

    fn connect(&mut self, tap: &SampleTap, route: Route<'_>) -> AudioResult<u32> {
        let Route::Audible(Some(handle)) = route else {
            return Err(AudioError::NoOutputDevice);
        };

        let sink = Sink::try_new(handle)?;
        sink.set_volume(self.gain);
        let sample_rate = self.queue(&sink, tap)?;
        sink.play();
        self.sink = Some(sink);
        self.tap = Some(tap.clone());

        debug!("Playing {:?} at {} Hz", self.path, sample_rate);
        Ok(sample_rate)
    }

    fn disconnect(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.tap = None;
    }

    fn set_paused(&mut self, paused: bool) {
        if let Some(sink) = &self.sink {
            if paused {
                sink.pause();
            } else {
                sink.play();
            }
        }
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain.max(0.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.gain);
        }
    }

    fn position(&self) -> Option<Duration> {
        self.sink.as_ref().map(|s| s.get_pos())
    }

    /// True once playback has drained (or was never started).
    fn is_finished(&self) -> bool {
        self.sink.as_ref().map(|s| s.empty()).unwrap_or(true)
    }

    fn seek(&mut self, position: Duration) -> AudioResult<()> {
        let (Some(sink), Some(tap)) = (&self.sink, &self.tap) else {
            return Ok(());
        };
        if sink.empty() {
            self.queue(sink, tap)?;
            debug!("Replaying {:?}", self.path);
        }
        sink.try_seek(position)?;
        Ok(())
    }
}

/// Live input from a capture device. Only ever routed to analysis.
pub struct MicrophoneStream {
    device_name: Option<String>,
    opened_name: Option<String>,
    stream: Option<cpal::Stream>,
}

impl MicrophoneStream {
    /// Use the named input device, or the host default.
    pub fn new(device_name: Option<String>) -> Self {
        Self {
            device_name,
            opened_name: None,
            stream: None,
        }
    }

    fn find_device(&self) -> AudioResult<cpal::Device> {
        let host = cpal::default_host();
        match &self.device_name {
            Some(name) => host
                .input_devices()?
                .find(|d| d.name().map(|n| &n == name).unwrap_or(false))
                .ok_or_else(|| {
                    AudioError::InputUnavailable(format!("input device '{}' not found", name))
                }),
            None => host.default_input_device().ok_or_else(|| {
                AudioError::InputUnavailable("no default input device available".to_string())
            }),
        }
    }
}

impl SourceNode for MicrophoneStream {
    fn label(&self) -> String {
        let name = self
            .opened_name
            .as_deref()
            .or(self.device_name.as_deref())
            .unwrap_or("default input");
        format!("mic: {}", name)
    }

    fn connect(&mut self, tap: &SampleTap, _route: Route<'_>) -> AudioResult<u32> {
        let device = self.find_device()?;
        let name = device.name()?;
        let supported = device.default_input_config()?;
        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels() as usize;
        let config: cpal::StreamConfig = supported.config();

        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => build_input::<f32>(&device, &config, channels, tap)?,
            cpal::SampleFormat::I16 => build_input::<i16>(&device, &config, channels, tap)?,
            cpal::SampleFormat::U16 => build_input::<u16>(&device, &config, channels, tap)?,
            other => {
                return Err(AudioError::InputUnavailable(format!(
                    "unsupported input sample format {:?}",
                    other
                )));
            }
        };
        stream.play()?;

        debug!("Capturing '{}' ({} ch @ {} Hz)", name, channels, sample_rate);
        self.opened_name = Some(name);
        self.stream = Some(stream);
        Ok(sample_rate)
    }

    fn disconnect(&mut self) {
        // Dropping the stream stops the device callback
        self.stream = None;
    }

    fn set_paused(&mut self, paused: bool) {
        if let Some(stream) = &self.stream {
            let result = if paused {
                stream.pause().map_err(|e| e.to_string())
            } else {
                stream.play().map_err(|e| e.to_string())
            };
            if let Err(e) = result {
                warn!("Failed to toggle input stream: {}", e);
            }
        }
    }
}

/// Build an input stream that down-mixes each callback into the tap.
fn build_input<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    tap: &SampleTap,
) -> AudioResult<cpal::Stream>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let tap = tap.clone();
    let mut scratch: Vec<f32> = Vec::new();
    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            scratch.clear();
            scratch.extend(data.iter().map(|&s| s.to_sample::<f32>()));
            tap.push_interleaved(&scratch, channels);
        },
        |err| error!("Audio input stream error: {}", err),
        None,
    )?;
    Ok(stream)
}
