// src/checker/html.rs
// =============================================================================
// This module builds the set of external links found in the built site.
//
// The site generator writes plain static HTML into an output directory
// (usually `public/`). We walk that directory, read every `.html` file and
// pull out absolute http/https URLs from two places:
// - `<a ... href="...">` anchors
// - `data-track... href="..."` tracking attributes
//
// We use regex matching instead of a DOM parser. The generator's output is
// predictable and we only care about absolute URLs, so a text scan is enough.
//
// Rust concepts:
// - BTreeSet: a sorted set, so duplicates vanish and iteration is stable
// - once_cell::Lazy: compile each regex once, on first use
// - Result + context: any read error aborts the whole scan
// =============================================================================

use anyhow::{bail, Context, Result};
use ignore::WalkBuilder;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Deduplicated, sorted collection of external link targets
pub type UrlSet = BTreeSet<String>;

/// Only files with this extension are scanned
pub const PAGE_EXTENSION: &str = "html";

// Anchor tags with an absolute href
static ANCHOR_HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<a\s[^>]*href=["']?(https?://[^"'\s>]+)["']?"#)
        .expect("anchor pattern is a valid regex")
});

// Tracking attributes that carry their own href
static TRACKING_HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"data-track[^>]*href=["']?(https?://[^"'\s>]+)["']?"#)
        .expect("tracking pattern is a valid regex")
});

// Extracts every absolute link from one HTML document
//
// Parameters:
//   html: the raw page text
//
// Returns: links in document order (may contain duplicates)
//
// Example:
//   html = r#"<a class="btn" href="https://ridewithgps.com/routes/1">Route</a>"#
//   result = ["https://ridewithgps.com/routes/1"]
pub fn extract_html_links(html: &str) -> Vec<String> {
    [&*ANCHOR_HREF, &*TRACKING_HREF]
        .iter()
        .flat_map(|pattern| pattern.captures_iter(html))
        .filter_map(|captures| captures.get(1))
        .map(|m| trim_quotes(m.as_str()).to_string())
        .collect()
}

fn trim_quotes(url: &str) -> &str {
    let url = url.strip_suffix('"').unwrap_or(url);
    url.strip_suffix('\'').unwrap_or(url)
}

// Walks the built site and collects the URL Set
//
// Parameters:
//   dir: the generator's output directory
//
// Returns: every unique external link, or an error if the directory is
// missing or any page cannot be read. A half-scanned site would quietly
// under-report dead links, so nothing is skipped.
pub fn build_url_set(dir: &Path) -> Result<UrlSet> {
    if !dir.is_dir() {
        bail!(
            "output directory '{}' does not exist or is not a directory",
            dir.display()
        );
    }

    let mut urls = UrlSet::new();
    let mut pages = 0usize;

    // standard_filters(false): built sites are not git checkouts, and a
    // stray .gitignore or hidden dir must not hide pages from the scan
    let walker = WalkBuilder::new(dir).standard_filters(false).build();

    for entry in walker {
        let entry = entry.with_context(|| format!("failed to walk '{}'", dir.display()))?;
        let path = entry.path();

        let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
        if !is_file || !is_page(path) {
            continue;
        }

        let bytes = fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))?;
        let html = String::from_utf8_lossy(&bytes);

        let found = extract_html_links(&html);
        debug!("{} link(s) in {}", found.len(), path.display());
        urls.extend(found);
        pages += 1;
    }

    debug!("scanned {} page(s), {} unique link(s)", pages, urls.len());
    Ok(urls)
}

fn is_page(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == PAGE_EXTENSION)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a BTreeSet instead of a HashSet?
//    - Both drop duplicates
//    - BTreeSet also keeps items sorted, so "check these links" always
//      visits them in the same order and test output is reproducible
//
// 2. What does captures.get(1) mean?
//    - Group 0 is the whole match (`<a href="...`)
//    - Group 1 is the first pair of parentheses in the pattern: just the URL
//
// 3. Why String::from_utf8_lossy?
//    - Minified HTML is almost always UTF-8, but one bad byte should not
//      make the whole page unreadable
//    - Invalid bytes become U+FFFD and the links around them still match
//
// 4. Why .expect() on the regexes?
//    - The patterns are constants; if they fail to compile it's a
//      programmer error, caught by the first test run
// -----------------------------------------------------------------------------
