// src/app/headless.rs
//! Print analysis frames as text instead of drawing the terminal UI.

use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use super::state::App;
use crate::analysis::AnalysisFrame;

/// One line per polled frame.
pub fn format_frame(index: u64, frame: &AnalysisFrame) -> String {
    let bands: Vec<String> = frame
        .frequency_bands
        .iter()
        .map(|b| format!("{:.3}", b))
        .collect();
    let a = &frame.audio_bands;
    format!(
        "{:>6} bands=[{}] bass={:.3} mid={:.3} treble={:.3} volume={:.3} beat={}",
        index,
        bands.join(" "),
        a.bass,
        a.mid,
        a.treble,
        a.volume,
        u8::from(frame.beat)
    )
}

/// Drive `app` at `frame_interval` and write every polled frame to `out`.
///
/// Stops after `limit` printed frames, or when a bound source plays to the
/// end or is released. With no limit and nothing bound it would never stop, so callers
/// bind a source first.
pub fn run_headless<W: Write>(
    app: &mut App,
    limit: Option<u64>,
    frame_interval: Duration,
    out: &mut W,
) -> Result<u64> {
    let mut printed = 0u64;
    let had_source = app.analyzer.active_source().is_some();

    while limit.is_none_or(|max| printed < max) {
        if let Some(frame) = app.tick() {
            writeln!(out, "{}", format_frame(printed, &frame))?;
            printed += 1;
        }
        if had_source && (app.ended || app.analyzer.active_source().is_none()) {
            break;
        }
        if !frame_interval.is_zero() {
            thread::sleep(frame_interval);
        }
    }

    out.flush()?;
    info!("Headless run printed {} frames", printed);
    Ok(printed)
}
