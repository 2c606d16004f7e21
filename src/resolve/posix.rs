//! Metadata-tool dependency resolution
//!
//! POSIX hosts ship `pkg-config`, so resolution is a subprocess call and a
//! token parse:
//! ```bash
//! pkg-config --cflags --libs <package>
//! ```
//! `-I`, `-L`, and `-l` tokens map onto the descriptor's include, library,
//! and link-target fields; any other token passes through unrecorded.

use super::ResolveError;
use crate::env_vars;
use crate::extension::ExtensionDescriptor;
use std::process::Command;

/// Marker the metadata tool prints when it does not know a package. Also
/// matches a shell reporting the tool itself missing, which fails the same
/// way for the same operator-visible reason.
const NOT_FOUND_MARKER: &str = "not found";

/// Dependency resolver backed by the platform metadata-query tool.
#[derive(Debug, Clone)]
pub struct PosixDependencyResolver {
    tool: String,
}

impl PosixDependencyResolver {
    /// Resolver using the `PKG_CONFIG` override, then `pkg-config` on PATH.
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_tool(env_vars::pkg_config().unwrap_or_else(|| "pkg-config".to_string()))
    }

    /// Resolver invoking an explicit tool (tests and overrides).
    #[must_use]
    pub fn with_tool(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }

    /// Query the metadata tool for `package` and record the parsed flags on
    /// `desc`.
    ///
    /// Fails with `DependencyNotFound` when the tool reports the package
    /// unknown or cannot be run at all.
    pub fn resolve(
        &self,
        package: &str,
        desc: &mut ExtensionDescriptor,
    ) -> Result<(), ResolveError> {
        let output = Command::new(&self.tool)
            .args(["--cflags", "--libs", package])
            .output()
            .map_err(|e| {
                ResolveError::not_found_with_hint(
                    package,
                    format!("The {} tool could not be run: {e}.", self.tool),
                )
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        crate::debug!("{} --cflags --libs {package}: {}", self.tool, text.trim());

        if text.contains(NOT_FOUND_MARKER) {
            return Err(ResolveError::not_found(package));
        }

        apply_flags(&text, desc);
        Ok(())
    }
}

/// Split the tool's output on whitespace and record recognized flag tokens.
/// The two-character prefix selects the field, the remainder of the token is
/// the value. Unrecognized prefixes are ignored, not errors.
fn apply_flags(output: &str, desc: &mut ExtensionDescriptor) {
    for token in output.split_whitespace() {
        if let Some(value) = token.strip_prefix("-I") {
            desc.add_include_dir(value);
        } else if let Some(value) = token.strip_prefix("-L") {
            desc.add_library_dir(value);
        } else if let Some(value) = token.strip_prefix("-l") {
            desc.add_library(value);
        }
    }
}
