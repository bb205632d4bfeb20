// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = dead links, 2 = error)
//
// Rust concepts used:
// - async/await: the link checker makes many network requests concurrently
// - Result<T, E>: for error handling, with anyhow for context
// - downcast_ref: to tell "dead links found" apart from real errors
// =============================================================================

// Module declarations - tells Rust about our other source files
mod checker; // src/checker/ - dead-link checking
mod cli; // src/cli.rs - command-line parsing
mod logging; // src/logging.rs - env_logger setup
mod report; // src/report.rs - progress lines and summary
mod site; // src/site/ - esbuild/hugo orchestration

use anyhow::{ensure, Result};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;

use cli::{Cli, Commands};
use report::{DeadLinksFound, Reporter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose, cli.quiet);

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) if e.downcast_ref::<DeadLinksFound>().is_some() => 1,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<()> {
    let site = cli.command.site();

    match cli.command {
        Commands::Build { .. } => site.build().await,
        Commands::BuildTs => site.build_ts().await,
        Commands::Serve => site.serve().await,
        Commands::Dev => site.dev().await,
        Commands::Watch => site.watch().await,
        Commands::Clean { .. } => site.clean().await,
        Commands::CheckLinks {
            dir,
            no_build,
            json,
            concurrency,
            timeout,
        } => {
            ensure!(concurrency > 0, "--concurrency must be at least 1");
            ensure!(timeout > 0, "--timeout must be at least 1 second");

            if !no_build {
                site.build().await?;
            }
            handle_check_links(&dir, json, concurrency, timeout).await
        }
    }
}

// Handles the 'check-links' subcommand once the site is built
//
// Returns Err(DeadLinksFound) when at least one link is dead, after the
// summary has been printed.
async fn handle_check_links(dir: &Path, json: bool, concurrency: usize, timeout: u64) -> Result<()> {
    let config = cli::checker_config(concurrency, timeout);
    let reporter = Arc::new(Reporter::stdout(json));

    reporter.note("\nChecking for dead links...");
    let report = checker::check_site(dir, &config, Arc::clone(&reporter)).await?;

    reporter.summary(&report)?;
    report.into_result()?;
    Ok(())
}
