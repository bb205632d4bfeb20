// src/checker/config.rs
// =============================================================================
// Run-wide settings for the dead-link checker.
//
// Everything the prober and dispatcher need is built once at startup and
// passed down by reference. Nothing here changes while a run is in progress.
// =============================================================================

use reqwest::Method;
use std::time::Duration;

use super::policy::DomainPolicy;

/// Maximum number of probes allowed in flight at once
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Per-request deadline, covering connect + redirects + body
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Redirect hops followed before a link is declared dead
pub const DEFAULT_MAX_REDIRECTS: usize = 3;

// Some sites answer bare HTTP clients with 403/429 but serve browsers fine,
// so every probe looks like a desktop browser.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Admission ceiling for concurrent probes (must be at least 1)
    pub concurrency: usize,
    pub timeout: Duration,
    pub max_redirects: usize,
    /// HTTP methods tried in order until one gives a conclusive verdict
    pub strategies: Vec<Method>,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub skip_domains: DomainPolicy,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            strategies: vec![Method::HEAD, Method::GET],
            user_agent: BROWSER_USER_AGENT.to_string(),
            accept: BROWSER_ACCEPT.to_string(),
            accept_language: BROWSER_ACCEPT_LANGUAGE.to_string(),
            skip_domains: DomainPolicy::default(),
        }
    }
}
