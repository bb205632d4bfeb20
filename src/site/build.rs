// src/site/build.rs
// =============================================================================
// Site build steps: bundle the TypeScript, run the generator, clean output.
//
// Strategy:
// - Every step shells out with tokio::process::Command
// - stdout/stderr are inherited, so the tools' own progress shows up as-is
// - A missing binary or non-zero exit aborts with the command line in the
//   error message
//
// Rust concepts:
// - PathBuf: owned paths, so tests can point the build at a temp dir
// - async process spawning: .status().await waits without blocking
// =============================================================================

use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::process::Command;

/// Where the generator writes the finished site
pub const DEFAULT_OUTPUT_DIR: &str = "public";

const SCRIPT_ENTRY: &str = "src/main.ts";
const SCRIPT_OUT_DIR: &str = "themes/linkpage/static/js";
const SCRIPT_BUNDLE: &str = "main.js";
const SCRIPT_TARGET: &str = "es2020";

const DEV_HINT: &str = "Note: Run 'linkpage build-ts' after TypeScript changes, \
                        or use 'linkpage watch' in another terminal";

const HUGO: &str = "hugo";
const ESBUILD: &str = "esbuild";

// Paths for one project checkout
#[derive(Debug, Clone)]
pub struct SiteBuild {
    output_dir: PathBuf,
    script_entry: PathBuf,
    script_out_dir: PathBuf,
}

impl Default for SiteBuild {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            script_entry: PathBuf::from(SCRIPT_ENTRY),
            script_out_dir: PathBuf::from(SCRIPT_OUT_DIR),
        }
    }
}

impl SiteBuild {
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    fn bundle_path(&self) -> PathBuf {
        self.script_out_dir.join(SCRIPT_BUNDLE)
    }

    fn esbuild_args(&self, watch: bool) -> Vec<String> {
        let mut args = vec![
            self.script_entry.display().to_string(),
            "--bundle".to_string(),
        ];
        if !watch {
            args.push("--minify".to_string());
        }
        args.push("--sourcemap".to_string());
        args.push(format!("--target={SCRIPT_TARGET}"));
        args.push(format!("--outfile={}", self.bundle_path().display()));
        if watch {
            args.push("--watch".to_string());
        }
        args
    }

    /// Bundles the site's TypeScript with esbuild
    pub async fn build_ts(&self) -> Result<()> {
        println!("Compiling TypeScript...");

        fs::create_dir_all(&self.script_out_dir)
            .await
            .with_context(|| {
                format!(
                    "failed to create output directory '{}'",
                    self.script_out_dir.display()
                )
            })?;

        run(ESBUILD, &self.esbuild_args(false)).await
    }

    /// Bundles scripts, then renders the site into `output_dir`
    pub async fn build(&self) -> Result<()> {
        self.build_ts().await?;

        println!("Building Hugo site...");
        let destination = self.output_dir.display().to_string();
        run(HUGO, &["--gc", "--minify", "--destination", destination.as_str()]).await
    }

    /// Starts the generator's dev server, drafts included
    pub async fn serve(&self) -> Result<()> {
        self.build_ts().await?;
        run(HUGO, &["server", "-D"]).await
    }

    /// Like `serve`, with a reminder that scripts are not rebuilt on change
    pub async fn dev(&self) -> Result<()> {
        self.build_ts().await?;

        println!("Starting development server...");
        println!("{DEV_HINT}");
        run(HUGO, &["server", "-D"]).await
    }

    /// Rebuilds the script bundle whenever a source file changes
    pub async fn watch(&self) -> Result<()> {
        println!("Watching TypeScript files...");
        run(ESBUILD, &self.esbuild_args(true)).await
    }

    /// Removes the output directory; a missing directory is fine
    pub async fn clean(&self) -> Result<()> {
        println!("Cleaning {} directory...", self.output_dir.display());

        match fs::remove_dir_all(&self.output_dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} was already gone", self.output_dir.display());
                Ok(())
            }
            Err(e) => Err(e)
                .with_context(|| format!("failed to remove '{}'", self.output_dir.display())),
        }
    }
}

// Runs an external tool with inherited stdio and waits for it
async fn run<S: AsRef<str>>(program: &str, args: &[S]) -> Result<()> {
    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    let command_line = format!("{} {}", program, args.join(" "));
    info!("running `{command_line}`");

    let status = Command::new(program)
        .args(&args)
        .status()
        .await
        .with_context(|| format!("failed to run `{command_line}` (is {program} installed?)"))?;

    if !status.success() {
        bail!("`{command_line}` exited with {status}");
    }
    Ok(())
}
