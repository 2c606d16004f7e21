//! Extension descriptor types
//!
//! A native extension is described by its dotted module name, the directory
//! holding its build-generator project definition, and the compiler/linker
//! inputs accumulated for it by dependency resolution.

use std::path::{Path, PathBuf};

/// One native extension to compile, plus the include directories, library
/// directories, and link targets its dependencies resolved to.
///
/// The collections are append-only and order-preserving; duplicates are
/// tolerated. A resolver records at most one include directory and one
/// library directory per dependency (first match wins), and link targets
/// only ever come from a dependency's chosen library directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDescriptor {
    name: String,
    source_root: PathBuf,
    include_dirs: Vec<PathBuf>,
    library_dirs: Vec<PathBuf>,
    libraries: Vec<String>,
}

impl ExtensionDescriptor {
    /// Create a descriptor with no resolved dependencies yet.
    ///
    /// `name` is the dotted module path of the installed extension
    /// (e.g. `pkg._native`); `source_root` is the directory containing the
    /// build generator's project definition.
    pub fn new(name: impl Into<String>, source_root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source_root: source_root.into(),
            include_dirs: Vec::new(),
            library_dirs: Vec::new(),
            libraries: Vec::new(),
        }
    }

    /// Dotted module path of the extension.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory containing the build generator's project definition.
    #[must_use]
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Resolved include directories, in resolution order.
    #[must_use]
    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.include_dirs
    }

    /// Resolved library directories, in resolution order.
    #[must_use]
    pub fn library_dirs(&self) -> &[PathBuf] {
        &self.library_dirs
    }

    /// Link-target names (library basenames, no prefix or extension).
    #[must_use]
    pub fn libraries(&self) -> &[String] {
        &self.libraries
    }

    /// Record an include directory.
    pub fn add_include_dir(&mut self, dir: impl Into<PathBuf>) {
        self.include_dirs.push(dir.into());
    }

    /// Record a library directory.
    pub fn add_library_dir(&mut self, dir: impl Into<PathBuf>) {
        self.library_dirs.push(dir.into());
    }

    /// Record a link-target name.
    pub fn add_library(&mut self, name: impl Into<String>) {
        self.libraries.push(name.into());
    }

    /// Final artifact directory for this extension under `out_root`.
    ///
    /// Derived from the dotted module name: every segment but the last is a
    /// package directory, the last names the compiled module itself, so
    /// `pkg.sub._native` lands in `out_root/pkg/sub`.
    #[must_use]
    pub fn artifact_dir(&self, out_root: &Path) -> PathBuf {
        let mut dir = out_root.to_path_buf();
        let mut segments = self.name.split('.').peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_some() {
                dir.push(segment);
            }
        }
        dir
    }
}
