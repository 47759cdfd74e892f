// src/ui/icons.rs
//! Nerd-font glyphs for the file chooser and status line.

use crate::audio::SourceKind;
use crate::fs::{Entry, FileCategory};

pub const FOLDER: &str = "\u{f07b}";
pub const MICROPHONE: &str = "\u{f130}";
pub const SPEAKER: &str = "\u{f028}";
pub const IDLE: &str = "\u{f04d}";

/// Glyph for a file chooser row.
pub fn icon_for_entry(entry: &Entry) -> &'static str {
    if entry.is_dir {
        return FOLDER;
    }
    match entry.category {
        FileCategory::Audio => "\u{f1c7}",
        FileCategory::Image => "\u{f1c5}",
        FileCategory::Video => "\u{f1c8}",
        FileCategory::Document => "\u{f15c}",
        FileCategory::Binary => "\u{f1c6}",
    }
}

/// Glyph for the active source kind.
pub fn icon_for_source(kind: Option<SourceKind>) -> &'static str {
    match kind {
        Some(SourceKind::Element) => SPEAKER,
        Some(SourceKind::Stream) => MICROPHONE,
        None => IDLE,
    }
}
