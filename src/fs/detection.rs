// src/fs/detection.rs
//! File type detection using magic numbers and extension-based fallback.

use std::{fmt, io, path::Path};

use infer::{Infer, MatcherType};
use mime_guess::MimeGuess;

/// High-level file categories.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FileCategory {
    Image,
    Audio,
    Video,
    Document,
    Binary,
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileCategory::Image => "Image",
            FileCategory::Audio => "Audio",
            FileCategory::Video => "Video",
            FileCategory::Document => "Document",
            FileCategory::Binary => "Binary",
        };
        write!(f, "{}", s)
    }
}

/// Holds a detected MIME type + category.
#[derive(Debug, Clone)]
pub struct FileType {
    pub mime: String,
    pub category: FileCategory,
}

impl FileType {
    pub fn is_audio(&self) -> bool {
        self.category == FileCategory::Audio
    }
}

/// Detect MIME type & category for a given file path.
///
/// Content sniffing wins; the extension is only consulted when the header is
/// not recognised. Fails only if the file cannot be read.
pub fn detect_file_type(path: &Path) -> io::Result<FileType> {
    if let Some(kind) = Infer::new().get_from_path(path)? {
        let mime = kind.mime_type().to_string();
        let category = match kind.matcher_type() {
            MatcherType::Image => FileCategory::Image,
            MatcherType::Audio => FileCategory::Audio,
            MatcherType::Video => FileCategory::Video,
            MatcherType::Doc | MatcherType::Text => FileCategory::Document,
            _ => FileCategory::Binary,
        };
        return Ok(FileType { mime, category });
    }

    let mime = MimeGuess::from_path(path).first_or_octet_stream().to_string();
    Ok(FileType {
        category: category_for_mime(&mime),
        mime,
    })
}

/// Map a MIME string's top-level type onto a category.
pub fn category_for_mime(mime: &str) -> FileCategory {
    match mime.split('/').next().unwrap_or("application") {
        "image" => FileCategory::Image,
        "audio" => FileCategory::Audio,
        "video" => FileCategory::Video,
        "text" => FileCategory::Document,
        "application" if mime != "application/octet-stream" => FileCategory::Document,
        _ => FileCategory::Binary,
    }
}
