// src/ui/widgets/ranges.rs
//! Perceptual range gauges, beat lamp and track progress.

use std::time::Duration;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::analysis::{AnalysisFrame, BeatState};
use crate::audio::TrackInfo;

/// What the range panel shows for one frame.
pub struct RangesView<'a> {
    pub frame: &'a AnalysisFrame,
    pub beat_state: BeatState,
    pub track: Option<&'a TrackInfo>,
    pub position: Option<Duration>,
}

/// (label, value, colour) rows in display order.
fn range_rows(frame: &AnalysisFrame) -> [(&'static str, f32, Color); 8] {
    let b = &frame.audio_bands;
    [
        ("bass", b.bass, Color::Red),
        ("low-mid", b.low_mid, Color::LightRed),
        ("mid", b.mid, Color::Yellow),
        ("high-mid", b.high_mid, Color::Green),
        ("treble", b.treble, Color::Cyan),
        ("presence", b.presence, Color::Blue),
        ("brilliance~", b.brilliance, Color::Magenta),
        ("volume", b.volume, Color::White),
    ]
}

/// Format seconds as `mm:ss`.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn render_ranges_panel(f: &mut Frame<'_>, area: Rect, view: &RangesView<'_>) {
    f.render_widget(Block::default().borders(Borders::ALL).title("2: Ranges"), area);

    let rows = range_rows(view.frame);
    let mut constraints = vec![Constraint::Length(1); rows.len()];
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(area);

    for (i, (label, value, color)) in rows.iter().enumerate() {
        f.render_widget(
            Gauge::default()
                .gauge_style(Style::default().fg(*color))
                .ratio(value.clamp(0.0, 1.0) as f64)
                .label(format!("{:<12}{:.2}", label, value)),
            inner[i],
        );
    }

    let lamp = if view.frame.beat {
        Span::styled(
            " ● BEAT ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(" ○ beat ", Style::default().fg(Color::DarkGray))
    };
    let beat_line = Line::from(vec![
        lamp,
        Span::raw(format!("  threshold {:.3}", view.beat_state.threshold)),
    ]);
    f.render_widget(Paragraph::new(beat_line), inner[rows.len()]);

    let progress_area = inner[rows.len() + 2];
    match view.track {
        Some(track) => {
            let elapsed = view.position.map(|p| p.as_secs()).unwrap_or(0);
            let total = track.duration_secs.max(1);
            let ratio = (elapsed as f64 / total as f64).clamp(0.0, 1.0);
            f.render_widget(
                Gauge::default()
                    .gauge_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC))
                    .ratio(ratio)
                    .label(format!(
                        "{}  {} / {}",
                        track.title,
                        format_clock(elapsed),
                        format_clock(track.duration_secs)
                    )),
                progress_area,
            );
        }
        None => {
            f.render_widget(
                Paragraph::new("No file playing").style(Style::default().fg(Color::DarkGray)),
                progress_area,
            );
        }
    }
}
