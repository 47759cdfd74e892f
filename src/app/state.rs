// src/app/state.rs
//! Host application state: source selection, frame pacing and drawing.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::KeyEvent;
use ratatui::{widgets::ListState, Frame};
use tracing::{info, warn};

use super::throttle::FrameThrottle;
use super::uniforms::{Preset, ReactiveUniforms};
use crate::{
    analysis::{AnalysisFrame, AudioAnalyzer},
    audio::{ContextState, FileElement, MicrophoneStream, SourceKind, TrackInfo},
    fs::{load_entries, tail_path, Entry},
    ui::{
        keybindings::{key_to_action, Action},
        layout::{compute_layout, Section, SectionVisibility},
        widgets::{render_file_list, render_ranges_panel, render_status, BandMeter, RangesView, StatusView},
    },
};

/// Smoothing change per key press.
pub const SMOOTHING_STEP: f32 = 0.05;
/// Output gain change per key press.
pub const GAIN_STEP: f32 = 0.1;
/// Seek distance per key press.
pub const SEEK_STEP: Duration = Duration::from_secs(5);

/// Main application state.
pub struct App {
    /// Directory being browsed
    pub current_dir: PathBuf,
    pub entries: Vec<Entry>,
    /// List widget state
    pub state: ListState,
    pub selected: usize,

    pub analyzer: AudioAnalyzer,
    throttle: FrameThrottle,
    /// Most recent polled frame
    pub frame: AnalysisFrame,
    pub uniforms: ReactiveUniforms,
    pub preset: Preset,
    /// Audible gain for file playback, 0..=1
    pub gain: f32,

    /// Name of the chooser entry currently playing
    pub playing: Option<String>,
    pub track: Option<TrackInfo>,
    /// The bound file played to the end and is waiting to be replayed
    pub ended: bool,
    /// Input device for the microphone toggle
    device: Option<String>,

    pub visibility: SectionVisibility,
    /// Last user-facing notice or error
    pub message: Option<String>,
    meter: BandMeter,
}

impl App {
    /// Browse the current directory, querying `analyzer` every `frame_skip` frames.
    pub fn new(analyzer: AudioAnalyzer, frame_skip: u32, device: Option<String>) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::in_dir(analyzer, frame_skip, device, cwd)
    }

    /// Like [`App::new`] but browsing `dir`.
    pub fn in_dir(
        analyzer: AudioAnalyzer,
        frame_skip: u32,
        device: Option<String>,
        dir: PathBuf,
    ) -> Result<Self> {
        let entries = load_entries(&dir)
            .with_context(|| format!("Failed to read directory {:?}", dir))?;
        let mut state = ListState::default();
        state.select(Some(0));

        let preset = Preset::default();
        let mut settings = preset.settings();
        settings.smoothing = analyzer.smoothing();

        Ok(Self {
            current_dir: dir,
            entries,
            state,
            selected: 0,
            analyzer,
            throttle: FrameThrottle::new(frame_skip),
            frame: AnalysisFrame::default(),
            uniforms: ReactiveUniforms::new(settings),
            preset,
            gain: 1.0,
            playing: None,
            track: None,
            ended: false,
            device,
            visibility: SectionVisibility::default(),
            message: None,
            meter: BandMeter::default(),
        })
    }

    /// Bind `path` as the source and start playback.
    pub fn open_file(&mut self, path: &Path) -> Result<()> {
        let element =
            FileElement::open(path).with_context(|| format!("Cannot play {:?}", path))?;
        let track = element.info().clone();
        self.analyzer
            .connect_element(Box::new(element))
            .with_context(|| format!("Failed to start playback of {:?}", path))?;
        self.analyzer.set_output_gain(self.gain);

        self.playing = path.file_name().map(|n| n.to_string_lossy().into_owned());
        self.message = Some(format!("Playing {}", track.title));
        self.track = Some(track);
        self.ended = false;
        Ok(())
    }

    /// Bind the microphone (analysis only).
    pub fn start_mic(&mut self) -> Result<()> {
        let mic = MicrophoneStream::new(self.device.clone());
        self.analyzer
            .connect_stream(Box::new(mic))
            .context("Microphone unavailable")?;
        self.playing = None;
        self.track = None;
        self.ended = false;
        self.message = Some("Listening".to_string());
        Ok(())
    }

    pub fn stop_source(&mut self) {
        self.analyzer.disconnect_source();
        self.playing = None;
        self.track = None;
        self.ended = false;
    }

    /// Move the bound source to `position`, replaying it if it had ended.
    pub fn seek_to(&mut self, position: Duration) -> Result<()> {
        if self.analyzer.active_source().is_none() {
            return Ok(());
        }
        self.analyzer
            .seek_source(position)
            .with_context(|| format!("Cannot seek to {}s", position.as_secs()))?;
        if self.ended {
            self.ended = false;
            self.analyzer.resume();
            if let Some(track) = &self.track {
                self.message = Some(format!("Playing {}", track.title));
            }
        }
        Ok(())
    }

    fn seek_by(&mut self, delta: Duration, forward: bool) {
        let position = self.analyzer.source_position().unwrap_or_default();
        let target = if forward {
            position + delta
        } else {
            position.saturating_sub(delta)
        };
        let result = self.seek_to(target);
        self.report(result);
    }

    /// Record a failure for the status bar instead of aborting.
    fn report(&mut self, result: Result<()>) {
        if let Err(e) = result {
            warn!("{:#}", e);
            self.message = Some(format!("{:#}", e));
        }
    }

    /// Advance one rendered frame. Returns the frame if the analyzer was polled.
    pub fn tick(&mut self) -> Option<AnalysisFrame> {
        let polled = if self.throttle.tick() {
            let frame = self.analyzer.poll();
            self.uniforms.apply(&frame);
            self.frame = frame;
            Some(frame)
        } else {
            None
        };
        self.uniforms.decay();

        // A finished file stays bound so it can be replayed
        if !self.ended && self.analyzer.source_finished() {
            let title = self.track.as_ref().map(|t| t.title.clone()).unwrap_or_default();
            info!("Source finished: {}", title);
            self.ended = true;
            self.message = Some(format!("Finished {}", title));
        }
        polled
    }

    fn reload_entries(&mut self) {
        match load_entries(&self.current_dir) {
            Ok(entries) => self.entries = entries,
            Err(e) => {
                self.entries.clear();
                self.message = Some(format!("Cannot read {:?}: {}", self.current_dir, e));
            }
        }
        self.selected = 0;
    }

    /// Handle a key event and return true if the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        match key_to_action(&key) {
            Action::ToggleSection(d) => self.visibility.toggle(d),
            Action::Down => {
                if self.selected + 1 < self.entries.len() {
                    self.selected += 1;
                }
            }
            Action::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            Action::Enter => {
                if let Some(entry) = self.entries.get(self.selected).cloned() {
                    if entry.is_dir {
                        self.current_dir.push(&entry.name);
                        self.reload_entries();
                    } else if entry.is_playable() {
                        let path = self.current_dir.join(&entry.name);
                        let result = self.open_file(&path);
                        self.report(result);
                    } else {
                        self.message = Some(format!("{} is not audio", entry.name));
                    }
                }
            }
            Action::Back => {
                if self.current_dir.pop() {
                    self.reload_entries();
                }
            }
            Action::ToggleMic => {
                if self.analyzer.active_source() == Some(SourceKind::Stream) {
                    self.stop_source();
                    self.message = Some("Microphone off".to_string());
                } else {
                    let result = self.start_mic();
                    self.report(result);
                }
            }
            Action::Disconnect => {
                self.stop_source();
                self.message = Some("Disconnected".to_string());
            }
            Action::SmoothingDown => self.nudge_smoothing(-SMOOTHING_STEP),
            Action::SmoothingUp => self.nudge_smoothing(SMOOTHING_STEP),
            Action::TogglePower => {
                if self.ended {
                    let result = self.seek_to(Duration::ZERO);
                    self.report(result);
                } else if self.analyzer.state() == ContextState::Running {
                    self.analyzer.suspend();
                } else {
                    self.analyzer.resume();
                }
            }
            Action::NextPreset => {
                self.preset = self.preset.next();
                let settings = self.preset.settings();
                self.uniforms.settings = settings;
                self.analyzer.set_smoothing(settings.smoothing);
                self.message = Some(format!("Preset {}", self.preset));
            }
            Action::GainDown => self.nudge_gain(-GAIN_STEP),
            Action::GainUp => self.nudge_gain(GAIN_STEP),
            Action::SeekBack => self.seek_by(SEEK_STEP, false),
            Action::SeekForward => self.seek_by(SEEK_STEP, true),
            Action::Restart => {
                let result = self.seek_to(Duration::ZERO);
                self.report(result);
            }
            Action::Quit => {
                self.analyzer.dispose();
                return true;
            }
            Action::None => {}
        }

        self.state.select(Some(self.selected));
        false
    }

    fn nudge_smoothing(&mut self, delta: f32) {
        let next = self.analyzer.smoothing() + delta;
        self.analyzer.set_smoothing(next);
        self.uniforms.settings.smoothing = self.analyzer.smoothing();
    }

    fn nudge_gain(&mut self, delta: f32) {
        self.gain = (self.gain + delta).clamp(0.0, 1.0);
        self.analyzer.set_output_gain(self.gain);
    }

    /// Draw the application UI.
    pub fn draw(&mut self, f: &mut Frame<'_>) {
        let layout = compute_layout(f.area(), &self.visibility);

        for (section, area) in layout.columns.iter().copied() {
            match section {
                Section::Files => {
                    let title = format!("1:  {}", tail_path(&self.current_dir, 3));
                    render_file_list(
                        f,
                        area,
                        &title,
                        &self.entries,
                        self.playing.as_deref(),
                        &mut self.state,
                    );
                }
                Section::Ranges => {
                    let view = RangesView {
                        frame: &self.frame,
                        beat_state: self.analyzer.beat_state(),
                        track: self.track.as_ref(),
                        position: self.analyzer.source_position(),
                    };
                    render_ranges_panel(f, area, &view);
                }
            }
        }

        if let Some(area) = layout.meter_area {
            self.meter.render(f, area, &self.uniforms);
        }

        let preset = self.preset.to_string();
        let status = StatusView {
            source: self.analyzer.active_source(),
            label: self.analyzer.source_label(),
            state: self.analyzer.state(),
            sample_rate: self.analyzer.sample_rate(),
            smoothing: self.analyzer.smoothing(),
            preset: &preset,
            gain: self.gain,
            message: self.message.as_deref(),
        };
        render_status(f, layout.status_area, &status);
    }
}
