//! Extforge command-line interface
//!
//! Native extension build orchestrator: locates third-party native
//! dependencies on the host machine and drives an out-of-tree `CMake` build
//! for each extension a package declares.

use clap::{Parser, Subcommand};
use std::process;

/// Display an error with its full cause chain
fn display_error(err: &anyhow::Error) {
    eprintln!("error: {err}");

    let mut source = err.source();
    while let Some(err) = source {
        eprintln!("caused by: {err}");
        source = err.source();
    }
}

#[derive(Parser)]
#[command(name = "extforge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A native extension build orchestrator", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the package's native extensions
    Build {
        /// Path to the manifest (defaults to ./extforge.toml)
        #[arg(long)]
        manifest: Option<String>,

        /// Directory final artifacts are placed in
        #[arg(long)]
        out_dir: Option<String>,

        /// Scratch directory for the generator's intermediate tree
        #[arg(long)]
        build_dir: Option<String>,

        /// Enable verbose output including generator logs
        #[arg(long)]
        verbose: bool,

        /// Enable debug logging
        #[arg(long)]
        debug: bool,
    },

    /// Show what dependency resolution finds for a package
    Resolve {
        /// Native package name (e.g. opencv4)
        package: String,

        /// Alternative name tried when the primary is not found
        #[arg(long)]
        fallback: Option<String>,

        /// Enable debug logging
        #[arg(long)]
        debug: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    // Extract the debug flag before consuming cli.command
    let debug = match &cli.command {
        Commands::Build { debug, .. } | Commands::Resolve { debug, .. } => *debug,
        Commands::Completion { .. } => false,
    };

    extforge::init_debug(debug);

    let result = match cli.command {
        Commands::Build {
            manifest,
            out_dir,
            build_dir,
            verbose,
            debug: _,
        } => commands::build::run(
            manifest.as_deref(),
            out_dir.as_deref(),
            build_dir.as_deref(),
            verbose,
        ),
        Commands::Resolve {
            package,
            fallback,
            debug: _,
        } => commands::resolve::run(&package, fallback.as_deref()),
        Commands::Completion { shell } => commands::completion::run(shell),
    };

    if let Err(err) = result {
        display_error(&err);
        process::exit(1);
    }
}

mod commands;
