//! Resolve command
//!
//! Show what dependency resolution finds for a package on this machine,
//! without running a build. Useful for diagnosing a missing install before
//! the host package system's build step hits it.

use anyhow::Result;
use extforge::{DependencySpec, ExtensionDescriptor, resolve};

pub(crate) fn run(package: &str, fallback: Option<&str>) -> Result<()> {
    let spec = DependencySpec::with_fallback(package, fallback.map(ToString::to_string));
    let mut desc = ExtensionDescriptor::new(package, ".");

    resolve::resolve_dependency(&spec, &mut desc)?;

    println!("package: {package}");
    for dir in desc.include_dirs() {
        println!("include: {}", dir.display());
    }
    for dir in desc.library_dirs() {
        println!("library dir: {}", dir.display());
    }
    for name in desc.libraries() {
        println!("link: {name}");
    }

    Ok(())
}
