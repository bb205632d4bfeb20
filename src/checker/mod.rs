// src/checker/mod.rs
// =============================================================================
// This module contains all dead-link checking logic.
//
// Submodules:
// - html: Walks the built site and collects the URL Set
// - policy: Domains we never probe (bot protection)
// - http: Probes a single URL and returns a Verdict
// - dispatch: Runs the prober over every URL with a concurrency ceiling
// - config: Run-wide settings shared by all of the above
//
// Flow: html -> dispatch (-> policy, http) -> report
// =============================================================================

mod config;
mod dispatch;
mod html;
mod http;
mod policy;

pub use config::CheckerConfig;

use dispatch::dispatch;
use html::build_url_set;
use http::HttpProber;

use anyhow::{Context, Result};
use log::info;
use std::path::Path;
use std::sync::Arc;

use crate::report::{Report, Reporter};

// Checks every external link in a built site
//
// Parameters:
//   dir: the site generator's output directory
//   config: timeouts, concurrency and exception list for this run
//   reporter: where progress lines go
//
// Returns: the Report. A missing directory or unreadable page is an error;
// dead links are not (callers turn them into a failure via
// Report::into_result).
pub async fn check_site(
    dir: &Path,
    config: &CheckerConfig,
    reporter: Arc<Reporter>,
) -> Result<Report> {
    let urls = build_url_set(dir).context("failed to extract links")?;

    if urls.is_empty() {
        reporter.note("No external links found.");
        return Ok(Report::default());
    }

    reporter.note(&format!(
        "Found {} unique external links to check\n",
        urls.len()
    ));
    info!(
        "checking {} link(s) with concurrency {}, timeout {:?}, max {} redirect(s)",
        urls.len(),
        config.concurrency,
        config.timeout,
        config.max_redirects
    );

    let prober = Arc::new(HttpProber::new(config)?);
    let report = dispatch(
        &urls,
        &config.skip_domains,
        prober,
        config.concurrency,
        reporter,
    )
    .await;

    Ok(report)
}
