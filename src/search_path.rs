//! Process search path snapshot
//!
//! Dependency discovery matches package names against the directories on
//! `PATH`. The path is read once into an immutable snapshot at the start of
//! a resolution, so a directory walk never observes a mid-flight environment
//! change and resolution stays deterministic within one invocation.

use std::env;
use std::path::{Path, PathBuf};

/// One directory from the process-wide search path.
///
/// Keeps the directory both as it appeared on the path (for filesystem
/// access) and in a lowercased, forward-slash form (for name matching).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPathEntry {
    raw: PathBuf,
    normalized: String,
}

impl SearchPathEntry {
    fn new(raw: PathBuf) -> Self {
        let normalized = raw.to_string_lossy().to_lowercase().replace('\\', "/");
        Self { raw, normalized }
    }

    /// The directory as it appeared on the search path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.raw
    }

    /// Lowercased, separator-normalized form used for matching.
    #[must_use]
    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

/// Immutable, ordered snapshot of the process-wide search path.
#[derive(Debug, Clone, Default)]
pub struct SearchPathIndex {
    entries: Vec<SearchPathEntry>,
}

impl SearchPathIndex {
    /// Snapshot `PATH` from the current environment.
    #[must_use]
    pub fn from_env() -> Self {
        let entries = env::var_os("PATH")
            .map(|path| env::split_paths(&path).map(SearchPathEntry::new).collect())
            .unwrap_or_default();
        Self { entries }
    }

    /// Build an index from explicit directories (tests and overrides).
    #[must_use]
    pub fn from_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let entries = dirs
            .into_iter()
            .map(|dir| SearchPathEntry::new(dir.into()))
            .collect();
        Self { entries }
    }

    /// Entries in original search-path order.
    #[must_use]
    pub fn entries(&self) -> &[SearchPathEntry] {
        &self.entries
    }

    /// Number of directories on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the search path has no directories at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_separators() {
        let index = SearchPathIndex::from_dirs([r"C:\Tools\OpenCV\bin"]);
        let entry = index.entries().first().unwrap();

        assert_eq!(entry.normalized(), "c:/tools/opencv/bin");
        assert_eq!(entry.path(), Path::new(r"C:\Tools\OpenCV\bin"));
    }

    #[test]
    fn preserves_order() {
        let index = SearchPathIndex::from_dirs(["/usr/local/bin", "/usr/bin", "/bin"]);

        let normalized: Vec<&str> = index.entries().iter().map(SearchPathEntry::normalized).collect();
        assert_eq!(normalized, ["/usr/local/bin", "/usr/bin", "/bin"]);
    }

    #[test]
    fn empty_input_yields_empty_index() {
        let index = SearchPathIndex::from_dirs(Vec::<PathBuf>::new());
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn from_env_does_not_panic() {
        // PATH is virtually always set; an unset PATH still yields an index.
        let _index = SearchPathIndex::from_env();
    }
}
