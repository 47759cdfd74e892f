// src/ui/widgets/meter.rs
//! Mirrored bar meter for the eight reactive bands.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::ReactiveUniforms;

/// Partial-cell glyphs, lowest to highest.
const EIGHTHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Renders band levels as bars mirrored around the centre column.
pub struct BandMeter {
    bar_width: usize,
    bar_gap: usize,
}

impl Default for BandMeter {
    fn default() -> Self {
        Self {
            bar_width: 3,
            bar_gap: 1,
        }
    }
}

impl BandMeter {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect, uniforms: &ReactiveUniforms) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("3: Bands  pulse {:.3}", uniforms.pulse));
        let inner = block.inner(area);

        // The pulse stretches every bar on a beat
        let levels: Vec<f32> = uniforms
            .audio_data
            .iter()
            .map(|v| (v * uniforms.pulse).clamp(0.0, 1.0))
            .collect();

        let color = if uniforms.pulse > 1.0 {
            Color::Magenta
        } else {
            Color::Cyan
        };
        let text = self.lines(&levels, inner.width as usize, inner.height as usize);
        f.render_widget(Paragraph::new(text).style(Style::default().fg(color)), inner);
        f.render_widget(block, area);
    }

    /// Build the meter as `height` lines of exactly `width` characters.
    pub fn lines(&self, levels: &[f32], width: usize, height: usize) -> String {
        if height == 0 || width < 2 {
            return String::new();
        }

        let spacing = self.bar_width + self.bar_gap;
        let bars_per_side = (width / 2 / spacing).min(levels.len());

        let mut rows = Vec::with_capacity(height);
        for row in 0..height {
            let row_from_bottom = height - row - 1;
            let mut line = String::with_capacity(width);

            // Left half runs high bands to low, right half low to high
            for i in (0..bars_per_side).rev() {
                self.push_bar(&mut line, levels[i], row_from_bottom, height);
                line.extend(std::iter::repeat_n(' ', self.bar_gap));
            }
            for &level in levels.iter().take(bars_per_side) {
                line.extend(std::iter::repeat_n(' ', self.bar_gap));
                self.push_bar(&mut line, level, row_from_bottom, height);
            }

            let mut cells: Vec<char> = line.chars().take(width).collect();
            let pad = width - cells.len();
            // Centre the meter
            let left = pad / 2;
            let mut centred: Vec<char> = std::iter::repeat_n(' ', left).collect();
            centred.append(&mut cells);
            centred.resize(width, ' ');
            rows.push(centred.into_iter().collect::<String>());
        }
        rows.join("\n")
    }

    fn push_bar(&self, line: &mut String, level: f32, row_from_bottom: usize, height: usize) {
        let glyph = cell_glyph(level, row_from_bottom, height);
        line.extend(std::iter::repeat_n(glyph, self.bar_width));
    }
}

/// Glyph for one cell of a bar filled to `level` of `height` rows.
fn cell_glyph(level: f32, row_from_bottom: usize, height: usize) -> char {
    let filled = level.clamp(0.0, 1.0) * height as f32;
    let full_rows = filled.floor() as usize;

    if row_from_bottom < full_rows {
        '█'
    } else if row_from_bottom == full_rows {
        let eighths = ((filled - full_rows as f32) * 8.0) as usize;
        if eighths == 0 {
            // Keep a floor line so silent bars stay visible
            if row_from_bottom == 0 { EIGHTHS[0] } else { ' ' }
        } else {
            EIGHTHS[(eighths - 1).min(7)]
        }
    } else {
        ' '
    }
}
