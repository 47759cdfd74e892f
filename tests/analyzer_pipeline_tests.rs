use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use beatscope::analysis::{AnalysisFrame, AudioAnalyzer, AudioBands};
use beatscope::audio::{
    AudioContext, ContextState, Route, SampleTap, SourceKind, SourceNode, DEFAULT_SAMPLE_RATE,
};
use beatscope::config::AnalyzerConfig;
use beatscope::error::{AudioError, AudioResult};

type Log = Rc<RefCell<Vec<String>>>;

/// Stand-in for a file or microphone: records calls, feeds nothing by itself.
struct FakeSource {
    name: &'static str,
    rate: u32,
    log: Log,
    deny: bool,
}

impl SourceNode for FakeSource {
    fn label(&self) -> String {
        self.name.to_string()
    }

    fn connect(&mut self, _tap: &SampleTap, route: Route<'_>) -> AudioResult<u32> {
        if self.deny {
            return Err(AudioError::InputUnavailable("permission denied".to_string()));
        }
        self.log.borrow_mut().push(format!(
            "connect {} audible={}",
            self.name,
            route.is_audible()
        ));
        Ok(self.rate)
    }

    fn disconnect(&mut self) {
        self.log.borrow_mut().push(format!("disconnect {}", self.name));
    }

    fn set_paused(&mut self, paused: bool) {
        self.log
            .borrow_mut()
            .push(format!("paused {} {}", self.name, paused));
    }

    fn seek(&mut self, position: Duration) -> AudioResult<()> {
        self.log
            .borrow_mut()
            .push(format!("seek {} {}ms", self.name, position.as_millis()));
        Ok(())
    }
}

/// A live input that keeps the trait's default timeline behaviour.
struct LiveInput;

impl SourceNode for LiveInput {
    fn label(&self) -> String {
        "live".to_string()
    }

    fn connect(&mut self, _tap: &SampleTap, _route: Route<'_>) -> AudioResult<u32> {
        Ok(44100)
    }

    fn disconnect(&mut self) {}
}

fn source(name: &'static str, log: &Log) -> Box<dyn SourceNode> {
    Box::new(FakeSource {
        name,
        rate: 48000,
        log: log.clone(),
        deny: false,
    })
}

fn analyzer_with(config: AnalyzerConfig) -> AudioAnalyzer {
    AudioAnalyzer::with_context(config, AudioContext::headless(config.fft_size)).unwrap()
}

fn analyzer() -> AudioAnalyzer {
    analyzer_with(AnalyzerConfig::default())
}

fn sine(bin: usize, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let phase = 2.0 * std::f64::consts::PI * (bin * i) as f64 / len as f64;
            phase.sin() as f32
        })
        .collect()
}

/// Deterministic broadband signal in [-0.5, 0.5].
fn noise(len: usize) -> Vec<f32> {
    let mut state: u32 = 0x1234_5678;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 8) as f32 / (1u32 << 24) as f32 - 0.5
        })
        .collect()
}

#[test]
fn test_fresh_analyzer_reports_silence() {
    let mut analyzer = analyzer();

    assert_eq!(analyzer.audio_bands(), AudioBands::default());
    assert!(!analyzer.detect_beat());
    assert_eq!(analyzer.frequency_bands(8), &[0.0; 8]);
    assert_eq!(analyzer.volume(), 0.0);
    assert_eq!(analyzer.waveform_data(), vec![128; 1024]);
    assert_eq!(analyzer.active_source(), None);
    assert_eq!(analyzer.state(), ContextState::Suspended);
}

#[test]
fn test_mic_is_severed_before_file_binds() {
    let log = Log::default();
    let mut analyzer = analyzer();

    analyzer.connect_stream(source("mic", &log)).unwrap();
    assert_eq!(analyzer.active_source(), Some(SourceKind::Stream));

    analyzer.connect_element(source("file", &log)).unwrap();
    assert_eq!(analyzer.active_source(), Some(SourceKind::Element));
    assert_eq!(analyzer.source_label(), Some("file"));

    assert_eq!(
        *log.borrow(),
        vec![
            "connect mic audible=false",
            "disconnect mic",
            "connect file audible=true",
        ]
    );
}

#[test]
fn test_connect_resumes_suspended_context() {
    let log = Log::default();
    let mut analyzer = analyzer();
    assert_eq!(analyzer.state(), ContextState::Suspended);

    analyzer.connect_stream(source("mic", &log)).unwrap();
    assert_eq!(analyzer.state(), ContextState::Running);
    assert_eq!(analyzer.sample_rate(), 48000);
    assert!(analyzer.tap().is_open());
}

#[test]
fn test_denied_microphone_surfaces_once() {
    let log = Log::default();
    let mut analyzer = analyzer();
    analyzer.connect_element(source("file", &log)).unwrap();

    let denied = Box::new(FakeSource {
        name: "mic",
        rate: 48000,
        log: log.clone(),
        deny: true,
    });
    let result = analyzer.connect_stream(denied);

    assert!(matches!(result, Err(AudioError::InputUnavailable(_))));
    assert_eq!(analyzer.active_source(), None);
    assert_eq!(analyzer.poll(), AnalysisFrame::default());
}

#[test]
fn test_double_disconnect_matches_fresh_analyzer() {
    let log = Log::default();
    let mut analyzer = analyzer();
    analyzer.connect_stream(source("mic", &log)).unwrap();
    analyzer.tap().push_slice(&noise(2048));

    analyzer.disconnect_source();
    analyzer.disconnect_source();

    let fresh = self::analyzer();
    assert_eq!(analyzer.active_source(), fresh.active_source());
    assert_eq!(analyzer.source_label(), fresh.source_label());
    assert_eq!(analyzer.sample_rate(), DEFAULT_SAMPLE_RATE);
    assert!(analyzer.tap().is_empty());
    assert!(analyzer.frequency_data().iter().all(|&b| b == 0));
    assert_eq!(
        log.borrow().iter().filter(|l| l.starts_with("disconnect")).count(),
        1
    );
}

#[test]
fn test_sine_lands_in_its_frequency_range() {
    let log = Log::default();
    let mut analyzer = analyzer_with(AnalyzerConfig {
        smoothing_time_constant: 0.0,
        ..Default::default()
    });
    analyzer.connect_stream(source("tone", &log)).unwrap();

    // Bin 64 of a 2048-point transform at 48 kHz is 1500 Hz
    analyzer.tap().push_slice(&sine(64, 2048));

    let near = analyzer.frequency_range(1400.0, 1600.0);
    let far = analyzer.frequency_range(8000.0, 9000.0);
    assert!(near > 0.3, "near = {}", near);
    assert_eq!(far, 0.0);

    // Empty and inverted windows are zero, never NaN
    assert_eq!(analyzer.frequency_range(30000.0, 40000.0), 0.0);
    assert_eq!(analyzer.frequency_range(2000.0, 1000.0), 0.0);
}

#[test]
fn test_onset_fires_once_then_suppresses() {
    let log = Log::default();
    let mut analyzer = analyzer();
    analyzer.connect_stream(source("mic", &log)).unwrap();

    for _ in 0..10 {
        assert!(!analyzer.poll().beat);
    }

    analyzer.tap().push_slice(&noise(2048));
    let onset = analyzer.poll();
    assert!(onset.beat);
    assert!(onset.frequency_bands.iter().all(|&b| b > 0.0));
    assert!(analyzer.beat_state().detected);

    // Bands keep rising on the held signal but the latch suppresses a repeat
    let next = analyzer.poll();
    assert!(next.frequency_bands[0] > onset.frequency_bands[0]);
    assert!(!next.beat);
    assert!(!analyzer.beat_state().detected);
}

#[test]
fn test_bands_release_after_disconnect() {
    let log = Log::default();
    let mut analyzer = analyzer();
    analyzer.connect_stream(source("mic", &log)).unwrap();
    analyzer.tap().push_slice(&noise(2048));

    for _ in 0..30 {
        analyzer.poll();
    }
    let loud = analyzer.poll().frequency_bands;

    analyzer.disconnect_source();
    let released = analyzer.poll().frequency_bands;
    for (before, after) in loud.iter().zip(&released) {
        assert!((after - before * 0.75).abs() < 1e-5);
    }
}

#[test]
fn test_waveform_tracks_tap() {
    let log = Log::default();
    let mut analyzer = analyzer();
    analyzer.connect_stream(source("mic", &log)).unwrap();
    analyzer.tap().push_slice(&[0.5; 1024]);

    assert!(analyzer.waveform_data().iter().all(|&b| b == 192));
}

#[test]
fn test_suspend_pauses_the_source() {
    let log = Log::default();
    let mut analyzer = analyzer();
    analyzer.connect_element(source("file", &log)).unwrap();

    assert!(analyzer.suspend());
    assert!(!analyzer.tap().is_open());
    assert!(analyzer.resume());
    assert!(analyzer.tap().is_open());

    let log = log.borrow();
    assert!(log.contains(&"paused file true".to_string()));
    assert!(log.contains(&"paused file false".to_string()));
}

#[test]
fn test_dispose_releases_and_refuses_new_sources() {
    let log = Log::default();
    let mut analyzer = analyzer();
    analyzer.connect_stream(source("mic", &log)).unwrap();

    analyzer.dispose();
    analyzer.dispose();
    assert_eq!(analyzer.state(), ContextState::Closed);
    assert_eq!(analyzer.active_source(), None);

    let result = analyzer.connect_stream(source("mic", &log));
    assert!(matches!(result, Err(AudioError::ContextClosed)));
}

#[test]
fn test_drop_disconnects() {
    let log = Log::default();
    {
        let mut analyzer = analyzer();
        analyzer.connect_stream(source("mic", &log)).unwrap();
    }
    assert_eq!(log.borrow().last().map(String::as_str), Some("disconnect mic"));
}

#[test]
fn test_narrow_band_query_keeps_shared_bands() {
    let log = Log::default();
    let mut analyzer = analyzer();
    analyzer.connect_stream(source("mic", &log)).unwrap();
    analyzer.tap().push_slice(&noise(2048));

    for _ in 0..40 {
        analyzer.poll();
    }
    let before = analyzer.poll().frequency_bands;

    assert_eq!(analyzer.frequency_bands(4).len(), 4);
    let after = analyzer.poll().frequency_bands;

    // Slots past the narrow query carry on from where they were
    for i in 4..8 {
        assert!(
            (after[i] - before[i]).abs() < 0.01,
            "band {} jumped from {} to {}",
            i,
            before[i],
            after[i]
        );
    }
    assert!(analyzer.volume() > 0.0);
}

#[test]
fn test_seek_reaches_the_bound_source() {
    let log = Log::default();
    let mut analyzer = analyzer();

    // Nothing bound: accepted and ignored
    analyzer.seek_source(Duration::from_secs(3)).unwrap();

    analyzer.connect_element(source("file", &log)).unwrap();
    analyzer.seek_source(Duration::from_millis(1500)).unwrap();
    assert!(log.borrow().contains(&"seek file 1500ms".to_string()));
    assert_eq!(analyzer.active_source(), Some(SourceKind::Element));
}

#[test]
fn test_live_input_ignores_seek() {
    let mut analyzer = analyzer();
    analyzer.connect_stream(Box::new(LiveInput)).unwrap();

    analyzer.seek_source(Duration::from_secs(10)).unwrap();
    assert_eq!(analyzer.source_position(), None);
    assert!(!analyzer.source_finished());
}
