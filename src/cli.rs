// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Each subcommand is one step of the site workflow:
//   build, build-ts, serve, dev, watch, clean  -> drive the external site tools
//   check-links                                -> build, then look for dead links
//
// We use clap's "derive" API: the CLI structure is described by Rust structs
// and enums, and clap generates the parser and --help text from them.
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::checker::CheckerConfig;
use crate::site::SiteBuild;

// The whole CLI
//
// --verbose and --quiet are `global`, so they work before or after the
// subcommand name.
#[derive(Parser, Debug)]
#[command(
    name = "linkpage",
    version,
    about = "Build the linkpage site and check it for dead links",
    long_about = "linkpage wraps the site build (esbuild + hugo) and checks every external \
                  link in the generated HTML. It exits non-zero when any link is dead, so it \
                  can gate a CI pipeline."
)]
pub struct Cli {
    /// Show debug logs (probe attempts, fallbacks, commands run)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all logs
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile TypeScript, then build the site
    Build {
        /// Directory the site is written to
        #[arg(long, default_value = "public")]
        dir: PathBuf,
    },

    /// Compile TypeScript only
    BuildTs,

    /// Compile TypeScript, then start the development server
    Serve,

    /// Same as serve, plus a reminder to rebuild TypeScript by hand
    Dev,

    /// Rebuild the TypeScript bundle on every change
    Watch,

    /// Remove the built site
    Clean {
        /// Directory to remove
        #[arg(long, default_value = "public")]
        dir: PathBuf,
    },

    /// Build the site and check every external link
    ///
    /// Example: linkpage check-links --no-build --dir public
    CheckLinks {
        /// Directory containing the built HTML
        #[arg(long, default_value = "public")]
        dir: PathBuf,

        /// Check the existing output without rebuilding first
        #[arg(long)]
        no_build: bool,

        /// Print the final report as JSON (progress goes to stderr)
        #[arg(long)]
        json: bool,

        /// Maximum number of links checked at the same time
        #[arg(long, default_value_t = 5)]
        concurrency: usize,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,
    },
}

impl Commands {
    // Site paths for the subcommands that touch the output directory
    pub fn site(&self) -> SiteBuild {
        match self {
            Commands::Build { dir } | Commands::Clean { dir } | Commands::CheckLinks { dir, .. } => {
                SiteBuild::with_output_dir(dir)
            }
            Commands::BuildTs | Commands::Serve | Commands::Dev | Commands::Watch => {
                SiteBuild::default()
            }
        }
    }
}

// Turns check-links flags into a checker configuration
//
// Only the knobs exposed on the command line are overridden; the redirect
// cap, probe methods, browser headers and exception list keep their
// defaults.
pub fn checker_config(concurrency: usize, timeout_secs: u64) -> CheckerConfig {
    CheckerConfig {
        concurrency,
        timeout: std::time::Duration::from_secs(timeout_secs),
        ..CheckerConfig::default()
    }
}
