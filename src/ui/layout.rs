// src/ui/layout.rs
//! Layout computation for the UI panels.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Visibility state for UI sections.
#[derive(Debug, Clone, Copy)]
pub struct SectionVisibility {
    pub files: bool,
    pub ranges: bool,
    pub meter: bool,
}

impl Default for SectionVisibility {
    fn default() -> Self {
        Self {
            files: true,
            ranges: true,
            meter: true,
        }
    }
}

impl SectionVisibility {
    /// Toggle a section by number (1-3).
    pub fn toggle(&mut self, section: usize) {
        match section {
            1 => self.files = !self.files,
            2 => self.ranges = !self.ranges,
            3 => self.meter = !self.meter,
            _ => {}
        }
    }
}

/// Panels laid out side by side in the upper area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Files,
    Ranges,
}

/// Computed layout areas for rendering.
pub struct ComputedLayout {
    /// Column areas paired with the section drawn there
    pub columns: Vec<(Section, Rect)>,
    /// Band meter (if visible)
    pub meter_area: Option<Rect>,
    /// Single status row at the bottom
    pub status_area: Rect,
}

/// Compute the layout based on total area and section visibility.
pub fn compute_layout(area: Rect, visibility: &SectionVisibility) -> ComputedLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let (body, status_area) = (rows[0], rows[1]);

    let mut weights: Vec<(Section, u16)> = Vec::new();
    if visibility.files {
        weights.push((Section::Files, 30));
    }
    if visibility.ranges {
        weights.push((Section::Ranges, 70));
    }

    // With no side panels the meter takes the whole body
    let (main_area, meter_area) = match (weights.is_empty(), visibility.meter) {
        (true, true) => (None, Some(body)),
        (false, true) => {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(body);
            (Some(split[0]), Some(split[1]))
        }
        (_, false) => (Some(body), None),
    };

    let columns = match main_area {
        Some(main_area) if !weights.is_empty() => {
            let sum: u16 = weights.iter().map(|(_, w)| *w).sum();
            let constraints: Vec<Constraint> = weights
                .iter()
                .map(|(_, w)| Constraint::Percentage((*w as u32 * 100 / sum as u32) as u16))
                .collect();
            let rects = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(constraints)
                .split(main_area);
            weights
                .iter()
                .map(|(section, _)| *section)
                .zip(rects.iter().copied())
                .collect()
        }
        _ => Vec::new(),
    };

    ComputedLayout {
        columns,
        meter_area,
        status_area,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_has_everything() {
        let layout = compute_layout(Rect::new(0, 0, 100, 40), &SectionVisibility::default());
        let sections: Vec<Section> = layout.columns.iter().map(|(s, _)| *s).collect();
        assert_eq!(sections, vec![Section::Files, Section::Ranges]);
        assert!(layout.meter_area.is_some());
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.status_area.y, 39);
    }

    #[test]
    fn test_meter_only_fills_body() {
        let mut visibility = SectionVisibility::default();
        visibility.toggle(1);
        visibility.toggle(2);
        let layout = compute_layout(Rect::new(0, 0, 80, 20), &visibility);
        assert!(layout.columns.is_empty());
        assert_eq!(layout.meter_area, Some(Rect::new(0, 0, 80, 19)));
    }

    #[test]
    fn test_hidden_meter() {
        let mut visibility = SectionVisibility::default();
        visibility.toggle(3);
        let layout = compute_layout(Rect::new(0, 0, 80, 20), &visibility);
        assert!(layout.meter_area.is_none());
        assert_eq!(layout.columns.len(), 2);
    }
}
