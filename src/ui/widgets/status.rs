// src/ui/widgets/status.rs
//! One-line status bar.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::audio::{ContextState, SourceKind};
use crate::ui::icons::icon_for_source;

/// Values summarised in the status bar.
pub struct StatusView<'a> {
    pub source: Option<SourceKind>,
    pub label: Option<&'a str>,
    pub state: ContextState,
    pub sample_rate: u32,
    pub smoothing: f32,
    pub preset: &'a str,
    pub gain: f32,
    pub message: Option<&'a str>,
}

pub fn status_text(view: &StatusView<'_>) -> String {
    let mut text = format!(
        "{} {} | {} | {} Hz | smoothing {:.2} | preset {} | gain {:.1}",
        icon_for_source(view.source),
        view.label.unwrap_or("no source"),
        view.state,
        view.sample_rate,
        view.smoothing,
        view.preset,
        view.gain,
    );
    if let Some(message) = view.message {
        text.push_str(" | ");
        text.push_str(message);
    }
    text
}

pub fn render_status(f: &mut Frame<'_>, area: Rect, view: &StatusView<'_>) {
    let color = match view.state {
        ContextState::Running => Color::Green,
        ContextState::Suspended => Color::Yellow,
        ContextState::Closed => Color::Red,
    };
    let line = Line::from(vec![Span::styled(status_text(view), Style::default().fg(color))]);
    f.render_widget(Paragraph::new(line), area);
}
