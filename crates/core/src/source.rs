//! File access used by the linter: reading scripts and includes, and
//! checking that files referenced by loader commands exist.
//!
//! Going through [`SourceProvider`] keeps the core free of direct `std::fs`
//! calls, so tests can lint whole include graphs from memory.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

pub trait SourceProvider {
    /// Read a script or header file.
    fn read_source(&self, path: &Path) -> Result<String, std::io::Error>;

    /// Whether a regular file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Stable identity of a path, used to stop include cycles.
    fn canonicalize(&self, path: &Path) -> PathBuf;
}

/// Filesystem-backed provider used by the CLI.
pub struct FileSystemProvider;

impl SourceProvider for FileSystemProvider {
    fn read_source(&self, path: &Path) -> Result<String, std::io::Error> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn canonicalize(&self, path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| normalize_path(path))
    }
}

/// In-memory provider mapping normalized paths to file contents.
pub struct InMemoryProvider {
    files: HashMap<PathBuf, String>,
}

impl InMemoryProvider {
    pub fn new(files: HashMap<PathBuf, String>) -> Self {
        let files = files
            .into_iter()
            .map(|(path, text)| (normalize_path(&path), text))
            .collect();
        Self { files }
    }

    /// Convenience constructor from `(path, contents)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(path, text)| (PathBuf::from(path), text.to_string()))
                .collect(),
        )
    }
}

impl SourceProvider for InMemoryProvider {
    fn read_source(&self, path: &Path) -> Result<String, std::io::Error> {
        let normalized = normalize_path(path);
        self.files.get(&normalized).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("file not found in memory: {}", normalized.display()),
            )
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(&normalize_path(path))
    }

    fn canonicalize(&self, path: &Path) -> PathBuf {
        normalize_path(path)
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                } else if components.is_empty() {
                    components.push(component);
                }
            }
            other => components.push(other),
        }
    }
    components.iter().collect()
}

/// Turn a path as written in a script (`\scripts\init.sqf`, `data/x.sqf`)
/// into a relative path with forward separators.
pub fn script_relative_path(written: &str) -> PathBuf {
    let unified = written.replace('\\', "/");
    PathBuf::from(unified.trim_start_matches('/'))
}
