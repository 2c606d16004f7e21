//! Build command
//!
//! Resolve each extension's native dependencies, then drive the build
//! generator so compiled artifacts land where the host package system
//! expects them.

use anyhow::{Context, Result};
use extforge::{BuildOrchestrator, ExtensionDescriptor, Manifest, manifest, resolve};
use std::path::{Path, PathBuf};

/// Default final-artifact root, relative to the manifest.
const DEFAULT_OUT_DIR: &str = "build/lib";
/// Default scratch tree for the generator's intermediates.
const DEFAULT_BUILD_DIR: &str = "build/temp";

/// Build every extension the manifest declares.
pub(crate) fn run(
    manifest_path: Option<&str>,
    out_dir: Option<&str>,
    build_dir: Option<&str>,
    verbose: bool,
) -> Result<()> {
    let manifest_path = manifest_path
        .map_or_else(|| manifest::find_manifest_in("."), PathBuf::from);
    let manifest = Manifest::parse_file(&manifest_path)?;
    let manifest_dir = manifest_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    if manifest.extensions.is_empty() {
        println!("{} has no native extensions to build", manifest.package.name);
        return Ok(());
    }

    if verbose {
        println!(
            "Building {} extension(s) for {}",
            manifest.extensions.len(),
            manifest.package.name
        );
    }

    let mut descriptors = Vec::new();
    for entry in &manifest.extensions {
        let mut desc =
            ExtensionDescriptor::new(&entry.name, manifest_dir.join(&entry.source_root));

        for dep in &entry.dependencies {
            resolve::resolve_dependency(dep, &mut desc).with_context(|| {
                format!("Failed to resolve dependencies for extension {}", entry.name)
            })?;
        }

        descriptors.push(desc);
    }

    let out_dir = out_dir.map_or_else(|| manifest_dir.join(DEFAULT_OUT_DIR), PathBuf::from);
    let build_dir = build_dir.map_or_else(|| manifest_dir.join(DEFAULT_BUILD_DIR), PathBuf::from);

    let orchestrator = BuildOrchestrator::new(out_dir, build_dir, verbose);
    let reports = orchestrator.build_all(&descriptors)?;

    for report in &reports {
        match &report.artifact {
            Some(artifact) => println!(
                "Built {} -> {} in {:?}",
                report.extension,
                artifact.display(),
                report.duration
            ),
            None => println!(
                "Built {} into {} in {:?}",
                report.extension,
                report.artifact_dir.display(),
                report.duration
            ),
        }
    }

    Ok(())
}
