//! Heuristic dependency resolution for hosts without a metadata tool
//!
//! Windows installs of native libraries rarely expose queryable metadata.
//! The reliable signals are that an install's dynamic libraries must be on
//! the search path for the package to be usable at all, and that the package
//! name appears, approximately, somewhere in its own install path.
//! Resolution therefore:
//!
//! 1. ranks search-path entries by closeness to the package name and picks
//!    the first existing one that directly contains a dynamic library
//!    (the "dll directory"),
//! 2. derives the install root from the dll directory's best-matching path
//!    segment,
//! 3. walks upward from the dll directory to the root, recording the first
//!    directly-contained `include` directory and an architecture-consistent
//!    library directory found by a recursive scan for `lib` subtrees,
//! 4. records every import library directly inside the chosen library
//!    directory as a link target.
//!
//! Walking upward bounds the search to a single install tree and avoids
//! false matches from unrelated libraries elsewhere on the filesystem.

use super::ResolveError;
use crate::extension::ExtensionDescriptor;
use crate::fuzzy;
use crate::platform::Arch;
use crate::search_path::{SearchPathEntry, SearchPathIndex};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Dynamic-library suffix probed for in search-path entries.
const DLL_SUFFIX: &str = ".dll";
/// Import-library suffix collected from `lib` directories.
const LIB_SUFFIX: &str = ".lib";

/// A plausible installation of a named dependency: its top-level install
/// directory and the search-path directory holding its dynamic libraries.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DependencyCandidate {
    root: PathBuf,
    dll_dir: PathBuf,
}

/// Heuristic dependency resolver over the process search path.
#[derive(Debug, Clone)]
pub struct WindowsDependencyResolver {
    search_path: SearchPathIndex,
    arch: Arch,
}

impl WindowsDependencyResolver {
    /// Resolver over the current process's search path and architecture.
    #[must_use]
    pub fn from_current_process() -> Self {
        Self::new(SearchPathIndex::from_env(), Arch::current())
    }

    /// Resolver over an explicit search path and architecture.
    #[must_use]
    pub const fn new(search_path: SearchPathIndex, arch: Arch) -> Self {
        Self { search_path, arch }
    }

    /// Locate `package` and record its include directory, library directory,
    /// and link targets on `desc`.
    pub fn resolve(
        &self,
        package: &str,
        desc: &mut ExtensionDescriptor,
    ) -> Result<(), ResolveError> {
        let package = package.to_lowercase();
        let candidate = self.find_candidate(&package)?;
        crate::debug!(
            "{package}: dll dir {}, install root {}",
            candidate.dll_dir.display(),
            candidate.root.display()
        );
        self.walk_install_tree(&package, &candidate, desc)
    }

    /// Pick the dll directory off the search path and derive the install
    /// root from its path segments.
    fn find_candidate(&self, package: &str) -> Result<DependencyCandidate, ResolveError> {
        let ranked = fuzzy::rank_by(package, self.search_path.entries(), SearchPathEntry::normalized);

        let dll_dir = ranked
            .into_iter()
            .map(SearchPathEntry::path)
            .find(|dir| dir.exists() && contains_dynamic_library(dir))
            .ok_or_else(|| not_found_on_path(package))?;

        let root = derive_root(package, dll_dir).ok_or_else(|| not_found_on_path(package))?;

        Ok(DependencyCandidate {
            root,
            dll_dir: dll_dir.to_path_buf(),
        })
    }

    /// Walk upward from the dll directory to the install root (inclusive),
    /// recording the first `include` directory and the architecture-correct
    /// library directory, then derive link targets from the latter.
    fn walk_install_tree(
        &self,
        package: &str,
        candidate: &DependencyCandidate,
        desc: &mut ExtensionDescriptor,
    ) -> Result<(), ResolveError> {
        let mut include_dir: Option<PathBuf> = None;
        let mut library_dir: Option<PathBuf> = None;

        for level in ancestor_levels(&candidate.dll_dir, &candidate.root) {
            if include_dir.is_none() {
                let include = level.join("include");
                if include.exists() {
                    include_dir = Some(include);
                }
            }

            if library_dir.is_none() {
                // Lexicographically-last candidate wins the tie-break.
                library_dir = self.library_dir_candidates(&level).pop_last();
            }

            if include_dir.is_some() && library_dir.is_some() {
                break;
            }
        }

        let (Some(include_dir), Some(library_dir)) = (include_dir, library_dir) else {
            return Err(ResolveError::not_found(package));
        };

        crate::debug!(
            "{package}: include {}, libraries {}",
            include_dir.display(),
            library_dir.display()
        );

        desc.add_include_dir(include_dir);
        for name in link_targets(&library_dir) {
            desc.add_library(name);
        }
        desc.add_library_dir(library_dir);
        Ok(())
    }

    /// Recursively collect directories under `level` that sit inside a `lib`
    /// subtree and directly contain import libraries, skipping every path
    /// marked for the other architecture.
    fn library_dir_candidates(&self, level: &Path) -> BTreeSet<PathBuf> {
        let mut dirs = BTreeSet::new();

        for entry in WalkDir::new(level).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !has_suffix(path, LIB_SUFFIX) || !under_lib_subtree(level, path) {
                continue;
            }
            if self.arch.rejects(&path.to_string_lossy()) {
                continue;
            }
            if let Some(parent) = path.parent() {
                dirs.insert(parent.to_path_buf());
            }
        }

        dirs
    }
}

fn not_found_on_path(package: &str) -> ResolveError {
    ResolveError::not_found_with_hint(
        package,
        "Add directory containing .dll files to system environment path.",
    )
}

/// Install root: the prefix of `dll_dir` up to and including the path
/// segment closest to the package name.
fn derive_root(package: &str, dll_dir: &Path) -> Option<PathBuf> {
    let components: Vec<&std::ffi::OsStr> =
        dll_dir.components().map(|c| c.as_os_str()).collect();
    let segments: Vec<String> = components
        .iter()
        .map(|s| s.to_string_lossy().to_lowercase())
        .collect();

    let best = fuzzy::closest(package, &segments, String::as_str)?;
    let index = segments.iter().position(|segment| segment == best)?;

    Some(components.iter().take(index + 1).copied().collect())
}

/// Levels examined by the upward walk: the dll directory's parent, up to and
/// including `root`. When the dll directory is itself the root, the root is
/// the only level, which bounds the walk in the corner where the best
/// matching segment is the dll directory's own name.
fn ancestor_levels(dll_dir: &Path, root: &Path) -> Vec<PathBuf> {
    if dll_dir == root {
        return vec![root.to_path_buf()];
    }

    let mut levels = Vec::new();
    let mut current = dll_dir;
    while let Some(parent) = current.parent() {
        levels.push(parent.to_path_buf());
        if parent == root {
            break;
        }
        current = parent;
    }
    levels
}

/// Whether `dir` directly contains at least one dynamic library.
fn contains_dynamic_library(dir: &Path) -> bool {
    fs::read_dir(dir).ok().is_some_and(|entries| {
        entries.flatten().any(|entry| {
            let path = entry.path();
            path.is_file() && has_suffix(&path, DLL_SUFFIX)
        })
    })
}

/// Whether `file` sits below a directory component named `lib` somewhere
/// under `level`.
fn under_lib_subtree(level: &Path, file: &Path) -> bool {
    file.parent()
        .and_then(|dir| dir.strip_prefix(level).ok())
        .is_some_and(|rel| {
            rel.components()
                .any(|c| c.as_os_str().eq_ignore_ascii_case("lib"))
        })
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().to_lowercase().ends_with(suffix))
}

/// Link-target names: every import library directly inside `library_dir`,
/// extension stripped, sorted for a deterministic order.
fn link_targets(library_dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(library_dir)
        .map(|entries| {
            entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.is_file() && has_suffix(path, LIB_SUFFIX))
                .filter_map(|path| {
                    path.file_stem()
                        .map(|stem| stem.to_string_lossy().into_owned())
                })
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_root_takes_prefix_through_best_segment() {
        let root = derive_root("opencv", Path::new("/deps/opencv/x64/vc15/bin")).unwrap();
        assert_eq!(root, PathBuf::from("/deps/opencv"));
    }

    #[test]
    fn derive_root_uses_first_occurrence_of_best_segment() {
        let root = derive_root("foo", Path::new("/foo/nested/foo/bin")).unwrap();
        assert_eq!(root, PathBuf::from("/foo"));
    }

    #[test]
    fn ancestor_levels_stop_at_root_inclusive() {
        let levels = ancestor_levels(
            Path::new("/deps/opencv/x64/vc15/bin"),
            Path::new("/deps/opencv"),
        );
        assert_eq!(
            levels,
            [
                PathBuf::from("/deps/opencv/x64/vc15"),
                PathBuf::from("/deps/opencv/x64"),
                PathBuf::from("/deps/opencv"),
            ]
        );
    }

    #[test]
    fn ancestor_levels_of_root_dll_dir_is_root_itself() {
        let levels = ancestor_levels(Path::new("/deps/opencv"), Path::new("/deps/opencv"));
        assert_eq!(levels, [PathBuf::from("/deps/opencv")]);
    }

    #[test]
    fn lib_subtree_requires_a_lib_component() {
        let level = Path::new("/deps/opencv");
        assert!(under_lib_subtree(
            level,
            Path::new("/deps/opencv/lib/opencv.lib")
        ));
        assert!(under_lib_subtree(
            level,
            Path::new("/deps/opencv/x64/lib/x64/opencv.lib")
        ));
        assert!(!under_lib_subtree(
            level,
            Path::new("/deps/opencv/bin/opencv.lib")
        ));
    }

    #[test]
    fn lib_component_matches_case_insensitively() {
        assert!(under_lib_subtree(
            Path::new("/deps/foo"),
            Path::new("/deps/foo/Lib/foo.lib")
        ));
    }

    #[test]
    fn suffix_check_is_case_insensitive() {
        assert!(has_suffix(Path::new("/a/OpenCV.DLL"), DLL_SUFFIX));
        assert!(has_suffix(Path::new("/a/foo.Lib"), LIB_SUFFIX));
        assert!(!has_suffix(Path::new("/a/foo.dll.txt"), DLL_SUFFIX));
    }
}
