//! Dependency resolution
//!
//! Locates the include directories, library directories, and link targets of
//! third-party native packages and records them on an `ExtensionDescriptor`.
//!
//! POSIX hosts have a metadata-query tool and get the thin wrapper in
//! [`posix`]. Windows hosts have no package database at all, so installs are
//! located heuristically from the search path and filesystem layout (see
//! [`windows`]).

mod posix;
mod windows;

pub use posix::PosixDependencyResolver;
pub use windows::WindowsDependencyResolver;

use crate::extension::ExtensionDescriptor;
use crate::manifest::DependencySpec;
use thiserror::Error;

/// Errors that can occur while locating a dependency
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No usable installation of the package could be located. Fatal: an
    /// extension missing an include or library path cannot compile.
    #[error("Could not find required package: {package}.{hint}")]
    DependencyNotFound {
        /// The package that could not be located
        package: String,
        /// Operator guidance, when the failure mode suggests any
        hint: String,
    },
}

impl ResolveError {
    pub(crate) fn not_found(package: impl Into<String>) -> Self {
        Self::DependencyNotFound {
            package: package.into(),
            hint: String::new(),
        }
    }

    pub(crate) fn not_found_with_hint(package: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::DependencyNotFound {
            package: package.into(),
            hint: format!(" {}", hint.into()),
        }
    }
}

/// Resolve `package` with the resolver native to the running platform.
pub fn resolve_package(
    package: &str,
    desc: &mut ExtensionDescriptor,
) -> Result<(), ResolveError> {
    if cfg!(windows) {
        WindowsDependencyResolver::from_current_process().resolve(package, desc)
    } else {
        PosixDependencyResolver::from_env().resolve(package, desc)
    }
}

/// Resolve one declared dependency, trying its fallback alternative when the
/// primary cannot be located. A fallback failure is final.
pub fn resolve_dependency(
    dep: &DependencySpec,
    desc: &mut ExtensionDescriptor,
) -> Result<(), ResolveError> {
    let primary = resolve_package(dep.name(), desc);
    match (primary, dep.fallback()) {
        (Err(ResolveError::DependencyNotFound { .. }), Some(fallback)) => {
            crate::debug!("{} not found, trying fallback {fallback}", dep.name());
            resolve_package(fallback, desc)
        }
        (result, _) => result,
    }
}
