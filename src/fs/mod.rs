// src/fs/mod.rs
//! Filesystem module - directory browsing and audio file detection.

pub mod browser;
pub mod detection;

pub use browser::{load_entries, tail_path, Entry};
pub use detection::{detect_file_type, FileCategory, FileType};
