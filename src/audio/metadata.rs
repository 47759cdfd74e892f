// src/audio/metadata.rs
//! Track information for file sources using Lofty.

use std::path::Path;

use anyhow::Result;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::Accessor;

/// Descriptive information about a file source, shown by the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackInfo {
    /// Tag title, or the file name when untagged
    pub title: String,
    /// Total track length in seconds.
    pub duration_secs: u64,
    /// Sample rate reported by the container, if any
    pub sample_rate: Option<u32>,
    /// Channel count reported by the container, if any
    pub channels: Option<u8>,
}

/// Load track information for a file path.
pub fn load_track_info(path: &Path) -> Result<TrackInfo> {
    let tagged_file = Probe::open(path)?.read()?;

    let title = tagged_file
        .primary_tag()
        .and_then(|tag| tag.title().map(|t| t.into_owned()))
        .unwrap_or_else(|| file_label(path));

    let props = tagged_file.properties();

    Ok(TrackInfo {
        title,
        duration_secs: props.duration().as_secs(),
        sample_rate: props.sample_rate(),
        channels: props.channels(),
    })
}

/// File name used when a track carries no title tag.
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
