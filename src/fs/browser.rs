// src/fs/browser.rs
//! Directory listing for the file chooser.

use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

use tracing::debug;

use super::detection::{detect_file_type, FileCategory};

/// One row of the file chooser.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
    pub category: FileCategory,
    /// Empty for directories and unreadable files
    pub mime: String,
}

impl Entry {
    /// Only audio files can be bound as a source.
    pub fn is_playable(&self) -> bool {
        !self.is_dir && self.category == FileCategory::Audio
    }
}

/// List `dir`: directories first, then files, each sorted case-insensitively.
pub fn load_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut entries: Vec<Entry> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            let path = e.path();
            if path.is_dir() {
                Entry {
                    name,
                    is_dir: true,
                    category: FileCategory::Binary,
                    mime: String::new(),
                }
            } else {
                match detect_file_type(&path) {
                    Ok(ft) => Entry {
                        name,
                        is_dir: false,
                        category: ft.category,
                        mime: ft.mime,
                    },
                    Err(err) => {
                        debug!("Skipping type detection for {:?}: {}", path, err);
                        Entry {
                            name,
                            is_dir: false,
                            category: FileCategory::Binary,
                            mime: String::new(),
                        }
                    }
                }
            }
        })
        .collect();

    entries.sort_by_key(|e| (!e.is_dir, e.name.to_lowercase()));
    Ok(entries)
}

/// Last `n` components of `path`, prefixed with an ellipsis when shortened.
pub fn tail_path(path: &Path, n: usize) -> String {
    let parts: Vec<String> = path
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if parts.len() <= n {
        return path.display().to_string();
    }

    let tail: PathBuf = parts[parts.len() - n..].iter().collect();
    format!("…/{}", tail.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_entries_sorts_dirs_first() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("zeta")).unwrap();
        fs::write(dir.path().join("Alpha.txt"), b"hello").unwrap();
        fs::write(dir.path().join("beta.txt"), b"hello").unwrap();

        let entries = load_entries(dir.path()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "Alpha.txt", "beta.txt"]);
        assert!(entries[0].is_dir);
        assert!(!entries[1].is_playable());
    }

    #[test]
    fn test_load_entries_missing_dir() {
        assert!(load_entries(Path::new("/no/such/dir")).is_err());
    }

    #[test]
    fn test_tail_path() {
        assert_eq!(tail_path(Path::new("/a/b"), 3), "/a/b");
        assert_eq!(tail_path(Path::new("/a/b/c/d/e"), 2), "…/d/e");
    }
}
