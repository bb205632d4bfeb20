// src/report.rs
// =============================================================================
// Progress lines while links are being checked, and the final summary.
//
// The reporter is shared by every probe task, so all output goes through one
// mutex. The lock is only held while a line is written, never while a request
// is in flight.
//
// With --json the progress lines go to stderr and stdout carries only the
// JSON report, so it can be piped straight into jq.
// =============================================================================

use anyhow::Result;
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// One unreachable link and why
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DeadLink {
    pub url: String,
    pub reason: String,
}

/// Aggregate outcome of a checking run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// URLs handed to the prober (skipped ones excluded)
    pub checked: usize,
    pub reachable: usize,
    pub skipped: Vec<String>,
    /// Sorted by URL
    pub dead: Vec<DeadLink>,
}

impl Report {
    /// True when no dead links were recorded
    ///
    /// Skipped and reachable counts never affect the outcome.
    pub fn is_success(&self) -> bool {
        self.dead.is_empty()
    }

    /// Turns a non-empty dead list into the run's failure signal
    pub fn into_result(self) -> std::result::Result<Self, DeadLinksFound> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(DeadLinksFound {
                count: self.dead.len(),
            })
        }
    }
}

/// Returned when one or more links are dead
///
/// main() looks for this error to pick exit code 1 instead of 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadLinksFound {
    pub count: usize,
}

impl fmt::Display for DeadLinksFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "found {} dead links", self.count)
    }
}

impl std::error::Error for DeadLinksFound {}

struct Output {
    progress: Box<dyn Write + Send>,
    summary: Box<dyn Write + Send>,
}

pub struct Reporter {
    json: bool,
    output: Mutex<Output>,
}

impl Reporter {
    /// Reporter writing to the terminal
    pub fn stdout(json: bool) -> Self {
        let progress: Box<dyn Write + Send> = if json {
            Box::new(io::stderr())
        } else {
            Box::new(io::stdout())
        };
        Self::with_writers(progress, Box::new(io::stdout()), json)
    }

    pub fn with_writers(
        progress: Box<dyn Write + Send>,
        summary: Box<dyn Write + Send>,
        json: bool,
    ) -> Self {
        Self {
            json,
            output: Mutex::new(Output {
                progress,
                summary,
            }),
        }
    }

    // A failed write to the terminal is not worth failing the run over.
    fn progress_line(&self, line: fmt::Arguments<'_>) {
        let mut out = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(out.progress, "{line}");
        let _ = out.progress.flush();
    }

    /// Free-form status line ("Found 12 unique external links")
    pub fn note(&self, message: &str) {
        self.progress_line(format_args!("{message}"));
    }

    pub fn reachable(&self, url: &str) {
        self.progress_line(format_args!("  ✓ {url}"));
    }

    pub fn dead(&self, url: &str) {
        self.progress_line(format_args!("  ❌ {url}"));
    }

    pub fn skipped(&self, url: &str) {
        self.progress_line(format_args!("  ⊘ {url} (skipped - bot protection)"));
    }

    /// Prints the final summary (human-readable or JSON)
    pub fn summary(&self, report: &Report) -> Result<()> {
        let mut out = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        let w = &mut out.summary;

        if self.json {
            serde_json::to_writer_pretty(&mut *w, report)?;
            writeln!(w)?;
            w.flush()?;
            return Ok(());
        }

        writeln!(
            w,
            "\nChecked {} link(s): {} reachable, {} dead, {} skipped",
            report.checked + report.skipped.len(),
            report.reachable,
            report.dead.len(),
            report.skipped.len()
        )?;

        if report.dead.is_empty() {
            writeln!(w, "\n✓ All links are valid!")?;
        } else {
            writeln!(w, "\n❌ Found {} dead or problematic links:", report.dead.len())?;
            for link in &report.dead {
                writeln!(w, "  • {}\n    Status: {}", link.url, link.reason)?;
            }
        }
        w.flush()?;
        Ok(())
    }
}
