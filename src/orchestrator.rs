//! Build orchestration
//!
//! Drives the external build generator (`CMake`) for each extension: version
//! probe, out-of-tree configure, build, and artifact placement at the path
//! the host package system expects.
//!
//! ```bash
//! cmake <source-root> \
//!     -DCMAKE_LIBRARY_OUTPUT_DIRECTORY=<artifact dir> \
//!     -DCMAKE_ARCHIVE_OUTPUT_DIRECTORY=<scratch dir>
//! cmake --build .
//! ```
//!
//! The orchestrator only supplies directory locations and resolved
//! dependency paths; all compiler-flag propagation lives in the external
//! project definition.

use crate::env_vars;
use crate::extension::ExtensionDescriptor;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Artifact suffixes a finished build may produce.
const ARTIFACT_SUFFIXES: [&str; 4] = ["so", "dylib", "dll", "pyd"];

/// Build generator step being driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    /// Project configuration into the scratch tree
    Configure,
    /// Compilation inside the configured scratch tree
    Build,
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configure => write!(f, "configure"),
            Self::Build => write!(f, "build"),
        }
    }
}

/// Errors that can occur while driving the build generator
#[derive(Debug, Error)]
pub enum BuildError {
    /// The build generator is not invokable at all. Raised before any
    /// configure or build step runs.
    #[error("Cannot find CMake executable. Install CMake from https://cmake.org")]
    ToolMissing,

    /// A configure or build step exited nonzero. Fatal, no retry.
    #[error("CMake {step} step failed for {extension} with exit code {code}")]
    BuildFailed {
        /// Extension whose build failed
        extension: String,
        /// Step that returned nonzero
        step: BuildStep,
        /// Exit code, or "unknown" when terminated by a signal
        code: String,
    },

    /// A filesystem or process operation around the build failed.
    #[error("Failed to {action}: {source}")]
    Io {
        /// What was being attempted
        action: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of one successful extension build
#[derive(Debug)]
pub struct BuildReport {
    /// Extension name
    pub extension: String,

    /// Directory the artifact was placed in
    pub artifact_dir: PathBuf,

    /// The compiled artifact, when one was identified after the build
    pub artifact: Option<PathBuf>,

    /// Build duration
    pub duration: Duration,

    /// Combined configure and build output
    pub output: String,
}

/// Build orchestrator
///
/// Configures and builds each extension out-of-tree: intermediates land in
/// the scratch directory, the compiled artifact in the directory derived
/// from the extension's dotted name under the output root.
#[derive(Debug, Clone)]
pub struct BuildOrchestrator {
    generator: PathBuf,
    out_dir: PathBuf,
    build_dir: PathBuf,
    verbose: bool,
}

impl BuildOrchestrator {
    /// Orchestrator using the `CMAKE` override, then `cmake` on PATH.
    #[must_use]
    pub fn new(out_dir: impl Into<PathBuf>, build_dir: impl Into<PathBuf>, verbose: bool) -> Self {
        let generator = env_vars::cmake().map_or_else(|| PathBuf::from("cmake"), PathBuf::from);
        Self::with_generator(generator, out_dir, build_dir, verbose)
    }

    /// Orchestrator invoking an explicit generator executable (tests and
    /// overrides).
    #[must_use]
    pub fn with_generator(
        generator: impl Into<PathBuf>,
        out_dir: impl Into<PathBuf>,
        build_dir: impl Into<PathBuf>,
        verbose: bool,
    ) -> Self {
        Self {
            generator: generator.into(),
            out_dir: out_dir.into(),
            build_dir: build_dir.into(),
            verbose,
        }
    }

    /// Build every extension in order. The generator is probed once up
    /// front; the first failing extension aborts the whole run.
    pub fn build_all(
        &self,
        extensions: &[ExtensionDescriptor],
    ) -> Result<Vec<BuildReport>, BuildError> {
        self.probe_generator()?;
        extensions.iter().map(|ext| self.build(ext)).collect()
    }

    /// Probe the generator's version command. The whole build aborts before
    /// any configure step when the generator is missing or broken.
    fn probe_generator(&self) -> Result<(), BuildError> {
        let probe = Command::new(&self.generator)
            .arg("--version")
            .output()
            .map(|out| out.status.success());

        match probe {
            Ok(true) => Ok(()),
            Ok(false) | Err(_) => Err(BuildError::ToolMissing),
        }
    }

    /// Configure and build one extension in the scratch tree.
    pub fn build(&self, ext: &ExtensionDescriptor) -> Result<BuildReport, BuildError> {
        let start = Instant::now();
        let mut output = String::new();

        let artifact_dir = ext.artifact_dir(&self.out_dir);
        create_dir(&artifact_dir)?;
        create_dir(&self.build_dir)?;

        if self.verbose {
            println!("Building extension {}...", ext.name());
            println!("  source: {}", ext.source_root().display());
            println!("  artifacts: {}", artifact_dir.display());
        }

        let mut configure = Command::new(&self.generator);
        configure
            .arg(ext.source_root())
            .arg(format!(
                "-DCMAKE_LIBRARY_OUTPUT_DIRECTORY={}",
                artifact_dir.display()
            ))
            .arg(format!(
                "-DCMAKE_ARCHIVE_OUTPUT_DIRECTORY={}",
                self.build_dir.display()
            ))
            .current_dir(&self.build_dir);
        apply_dependency_paths(&mut configure, ext);
        apply_toolchain_env(&mut configure);
        self.run_step(ext.name(), BuildStep::Configure, &mut configure, &mut output)?;

        let mut build = Command::new(&self.generator);
        build.args(["--build", "."]).current_dir(&self.build_dir);
        self.run_step(ext.name(), BuildStep::Build, &mut build, &mut output)?;

        let artifact = find_artifact(&artifact_dir);
        if self.verbose
            && let Some(found) = &artifact
        {
            println!("  built: {}", found.display());
        }

        Ok(BuildReport {
            extension: ext.name().to_string(),
            artifact_dir,
            artifact,
            duration: start.elapsed(),
            output,
        })
    }

    /// Run one generator step, collecting its output. Nonzero exit is fatal.
    fn run_step(
        &self,
        extension: &str,
        step: BuildStep,
        cmd: &mut Command,
        output: &mut String,
    ) -> Result<(), BuildError> {
        crate::debug!("{extension}: running {step} step: {cmd:?}");

        let out = cmd.output().map_err(|source| BuildError::Io {
            action: format!("execute {} {step} step", self.generator.display()),
            source,
        })?;

        output.push_str(&String::from_utf8_lossy(&out.stdout));
        output.push_str(&String::from_utf8_lossy(&out.stderr));

        if out.status.success() {
            Ok(())
        } else {
            Err(BuildError::BuildFailed {
                extension: extension.to_string(),
                step,
                code: out
                    .status
                    .code()
                    .map_or_else(|| "unknown".to_string(), |c| c.to_string()),
            })
        }
    }
}

/// Idempotent directory creation: an already-populated output tree is fine.
fn create_dir(dir: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(dir).map_err(|source| BuildError::Io {
        action: format!("create directory {}", dir.display()),
        source,
    })
}

/// Hand the resolved dependency locations to the project definition.
///
/// `CMAKE_INCLUDE_PATH` and `CMAKE_LIBRARY_PATH` are honored by `find_path`
/// and `find_library`, so the external definition can locate what this run
/// resolved. Both cache-entry and environment forms are set; link-target
/// names ride along in `EXTFORGE_LIBRARIES`.
fn apply_dependency_paths(cmd: &mut Command, ext: &ExtensionDescriptor) {
    if !ext.include_dirs().is_empty() {
        let joined = join_cmake_list(ext.include_dirs());
        cmd.arg(format!("-DCMAKE_INCLUDE_PATH={joined}"));
        cmd.env("CMAKE_INCLUDE_PATH", &joined);
    }
    if !ext.library_dirs().is_empty() {
        let joined = join_cmake_list(ext.library_dirs());
        cmd.arg(format!("-DCMAKE_LIBRARY_PATH={joined}"));
        cmd.env("CMAKE_LIBRARY_PATH", &joined);
    }
    if !ext.libraries().is_empty() {
        cmd.env("EXTFORGE_LIBRARIES", ext.libraries().join(";"));
    }
}

/// Forward compiler overrides to the configure step.
///
/// `CMake` respects both `CMAKE_*` cache entries and the standard compiler
/// environment variables.
fn apply_toolchain_env(cmd: &mut Command) {
    if let Some(cc) = env_vars::cc() {
        cmd.env("CC", &cc);
        cmd.arg(format!("-DCMAKE_C_COMPILER={cc}"));
    }
    if let Some(cxx) = env_vars::cxx() {
        cmd.env("CXX", &cxx);
        cmd.arg(format!("-DCMAKE_CXX_COMPILER={cxx}"));
    }
    if let Some(cflags) = env_vars::cflags() {
        cmd.env("CFLAGS", &cflags);
        cmd.arg(format!("-DCMAKE_C_FLAGS={cflags}"));
    }
    if let Some(cxxflags) = env_vars::cxxflags() {
        cmd.env("CXXFLAGS", &cxxflags);
        cmd.arg(format!("-DCMAKE_CXX_FLAGS={cxxflags}"));
    }
    if let Some(ldflags) = env_vars::ldflags() {
        cmd.env("LDFLAGS", &ldflags);
        cmd.arg(format!("-DCMAKE_SHARED_LINKER_FLAGS={ldflags}"));
    }
}

/// `CMake` list syntax: semicolon-separated.
fn join_cmake_list(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(";")
}

/// Find the compiled artifact directly inside `artifact_dir`, if the build
/// produced an identifiable one. Sorted so the pick is deterministic when
/// several are present.
fn find_artifact(artifact_dir: &Path) -> Option<PathBuf> {
    let mut found: Vec<PathBuf> = fs::read_dir(artifact_dir)
        .ok()?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ARTIFACT_SUFFIXES.contains(&ext.to_string_lossy().as_ref()))
        })
        .collect();
    found.sort();
    found.into_iter().next()
}
