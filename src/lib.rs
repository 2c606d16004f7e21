//! Extforge internal library code

pub mod debug;
pub mod env_vars;
pub mod extension;
pub mod fuzzy;
pub mod manifest;
pub mod orchestrator;
pub mod platform;
pub mod resolve;
pub mod search_path;

// Re-export common types for convenience
pub use debug::{init_debug, is_debug_enabled};
pub use extension::ExtensionDescriptor;
pub use manifest::{DependencySpec, ExtensionEntry, Manifest, PackageMetadata, find_manifest_in};
pub use orchestrator::{BuildError, BuildOrchestrator, BuildReport, BuildStep};
pub use platform::Arch;
pub use resolve::{
    PosixDependencyResolver, ResolveError, WindowsDependencyResolver, resolve_dependency,
    resolve_package,
};
pub use search_path::{SearchPathEntry, SearchPathIndex};
