//! Host package manifest
//!
//! The host package system describes its package and native extensions in a
//! TOML manifest (`extforge.toml`). Package metadata is opaque to this tool:
//! it is read here and passed through untouched. The extension entries are
//! what drive the build.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default manifest file name.
pub const MANIFEST_FILE: &str = "extforge.toml";

/// The host package descriptor plus the extensions requiring a build.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Opaque host package metadata, passed through unmodified
    pub package: PackageMetadata,

    /// Native extensions to compile
    #[serde(default, rename = "extension")]
    pub extensions: Vec<ExtensionEntry>,
}

/// Host package metadata. Nothing here is interpreted beyond `readme`,
/// which names the long-description file to read.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageMetadata {
    /// Package name
    pub name: String,

    /// Package version string
    #[serde(default)]
    pub version: Option<String>,

    /// Short description
    #[serde(default)]
    pub description: Option<String>,

    /// Long-description file, relative to the manifest
    #[serde(default)]
    pub readme: Option<String>,
}

/// One native extension declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExtensionEntry {
    /// Dotted module path of the installed extension (e.g. `pkg._native`)
    pub name: String,

    /// Directory containing the build generator's project definition,
    /// relative to the manifest
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,

    /// Third-party native packages the extension compiles and links against
    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,
}

fn default_source_root() -> PathBuf {
    PathBuf::from(".")
}

/// A required native dependency.
///
/// Either a bare package name or a name with a fallback alternative tried
/// when the primary cannot be located (`opencv4` falling back to `opencv`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    /// Bare package name
    Name(String),

    /// Package name with a fallback alternative
    Detailed {
        /// Primary package name
        name: String,
        /// Alternative tried when the primary is not found
        #[serde(default)]
        fallback: Option<String>,
    },
}

impl DependencySpec {
    /// Dependency on a single package name with no fallback.
    pub fn new(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Dependency with an optional fallback alternative.
    pub fn with_fallback(name: impl Into<String>, fallback: Option<String>) -> Self {
        Self::Detailed {
            name: name.into(),
            fallback,
        }
    }

    /// Primary package name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Detailed { name, .. } => name,
        }
    }

    /// Fallback package name, if declared.
    #[must_use]
    pub fn fallback(&self) -> Option<&str> {
        match self {
            Self::Name(_) => None,
            Self::Detailed { fallback, .. } => fallback.as_deref(),
        }
    }
}

impl Manifest {
    /// Parse a manifest from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse manifest")
    }

    /// Parse a manifest from a TOML file.
    pub fn parse_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest at {}", path.display()))?;
        Self::parse(&content)
    }

    /// Long-description text passthrough: the contents of the `readme` file,
    /// read relative to `manifest_dir`, untouched.
    pub fn long_description(&self, manifest_dir: &Path) -> Result<Option<String>> {
        match &self.package.readme {
            Some(readme) => {
                let path = manifest_dir.join(readme);
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read readme at {}", path.display()))?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }
}

/// Find the manifest in `dir`. Defaults to `extforge.toml` whether or not it
/// exists, so the caller reports a read error against the expected path.
#[must_use]
pub fn find_manifest_in(dir: impl AsRef<Path>) -> PathBuf {
    dir.as_ref().join(MANIFEST_FILE)
}
