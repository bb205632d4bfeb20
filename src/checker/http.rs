// src/checker/http.rs
// =============================================================================
// This module decides whether a single URL is alive.
//
// Key functionality:
// - Rejects malformed URLs without touching the network
// - Tries an ordered list of HTTP methods (HEAD first, then GET)
// - Caps redirects so redirect loops can't stall the run
// - Maps every outcome to a Verdict with a human-readable reason
//
// Why HEAD then GET?
// - HEAD is cheap: no body to download
// - Some servers don't implement HEAD (405/501) or reject it, so a
//   non-conclusive HEAD falls back to a full GET
//
// Rust concepts:
// - Traits: `Probe` lets tests swap in a fake prober
// - async/await: network I/O without blocking a thread
// - Enums with data: Verdict and Reason carry exactly what went wrong
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::{Client, Method};
use std::error::Error as StdError;
use std::fmt;
use url::Url;

use super::config::CheckerConfig;

/// Why a link was judged unreachable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    /// The URL could not be turned into a request
    InvalidUrl(String),
    /// The per-request deadline passed
    Timeout,
    /// DNS, connect, TLS or other transport failure
    Transport(String),
    /// Final response status was 400 or above
    HttpStatus(u16),
    /// The redirect chain exceeded the configured limit
    TooManyRedirects,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::InvalidUrl(msg) => write!(f, "invalid URL: {msg}"),
            Reason::Timeout => write!(f, "request timed out"),
            Reason::Transport(msg) => write!(f, "request failed: {msg}"),
            Reason::HttpStatus(code) => write!(f, "HTTP {code}"),
            Reason::TooManyRedirects => write!(f, "too many redirects"),
        }
    }
}

/// Reachability outcome of probing one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Reachable,
    Unreachable(Reason),
}

impl Verdict {
    // A conclusive verdict stops the strategy list.
    //
    // Timeouts and redirect loops would just repeat under another method,
    // and an invalid URL never reaches the network at all.
    fn is_conclusive(&self) -> bool {
        matches!(
            self,
            Verdict::Reachable
                | Verdict::Unreachable(
                    Reason::Timeout | Reason::TooManyRedirects | Reason::InvalidUrl(_)
                )
        )
    }
}

/// Anything that can judge a URL
///
/// The dispatcher only talks to this trait, so tests can count calls or
/// measure concurrency without a real network.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, url: &str) -> Verdict;
}

// Probes links over real HTTP
//
// The reqwest Client holds a connection pool and is safe to share across
// tasks. One HttpProber is built per run.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    strategies: Vec<Method>,
}

impl HttpProber {
    pub fn new(config: &CheckerConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("invalid User-Agent header")?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&config.accept).context("invalid Accept header")?,
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)
                .context("invalid Accept-Language header")?,
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(redirect_policy(config.max_redirects))
            .default_headers(headers)
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            client,
            strategies: config.strategies.clone(),
        })
    }

    // One request with one method, body drained before returning
    async fn attempt(&self, method: Method, url: Url) -> Verdict {
        let label = method.clone();
        match self.client.request(method, url.clone()).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                debug!("{label} {url} -> {status}");
                // Read the body to the end so the connection goes back to
                // the pool. A body that stalls or breaks off after a good
                // status line is a dead link too; an error status already
                // says enough.
                if let Err(e) = response.bytes().await {
                    debug!("{label} {url} body failed: {e}");
                    if status < 400 {
                        return verdict_for_error(&e);
                    }
                }
                verdict_for_status(status)
            }
            Err(e) => {
                debug!("{label} {url} failed: {e}");
                verdict_for_error(&e)
            }
        }
    }
}

#[async_trait]
impl Probe for HttpProber {
    async fn probe(&self, url: &str) -> Verdict {
        let parsed = match parse_probe_url(url) {
            Ok(parsed) => parsed,
            Err(reason) => return Verdict::Unreachable(reason),
        };

        let mut verdict = Verdict::Unreachable(Reason::InvalidUrl(
            "no probe methods configured".to_string(),
        ));

        for (i, method) in self.strategies.iter().enumerate() {
            verdict = self.attempt(method.clone(), parsed.clone()).await;
            if verdict.is_conclusive() {
                break;
            }
            if let Some(next) = self.strategies.get(i + 1) {
                debug!("{method} was not conclusive for {url}, retrying with {next}");
            }
        }

        verdict
    }
}

// Rejects anything that can't be an http(s) request
fn parse_probe_url(url: &str) -> std::result::Result<Url, Reason> {
    let parsed = Url::parse(url).map_err(|e| Reason::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(parsed),
        "http" | "https" => Err(Reason::InvalidUrl("missing host".to_string())),
        other => Err(Reason::InvalidUrl(format!("unsupported scheme '{other}'"))),
    }
}

// Follows up to `max` hops; the next one fails the request.
//
// reqwest counts the original URL in `previous()`, so the first redirect
// sees a length of 1.
fn redirect_policy(max: usize) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() > max {
            attempt.error("too many redirects")
        } else {
            attempt.follow()
        }
    })
}

// Status codes:
// - below 400: reachable (redirects were already followed by the client)
// - 400 and above: dead, with the code as the reason
fn verdict_for_status(status: u16) -> Verdict {
    if status >= 400 {
        Verdict::Unreachable(Reason::HttpStatus(status))
    } else {
        Verdict::Reachable
    }
}

fn verdict_for_error(error: &reqwest::Error) -> Verdict {
    let reason = if error.is_redirect() {
        Reason::TooManyRedirects
    } else if error.is_timeout() {
        Reason::Timeout
    } else if error.is_builder() {
        Reason::InvalidUrl(error_chain(error))
    } else {
        Reason::Transport(error_chain(error))
    };
    Verdict::Unreachable(reason)
}

// reqwest's top-level message is generic ("error sending request"); the
// useful part (DNS failure, refused connection) lives in the source chain.
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why #[async_trait]?
//    - The dispatcher stores the prober as Arc<dyn Probe>
//    - Trait objects need a fixed future type; async_trait boxes it for us
//
// 2. Why drain the body with .bytes()?
//    - A response whose body was never read can't return its connection
//      to the pool
//    - Reading and discarding it keeps the pool healthy when checking
//      dozens of links on the same host
//
// 3. What is Policy::custom?
//    - A closure called before every redirect hop
//    - attempt.follow() continues, attempt.error(..) fails the request
//      and surfaces as a reqwest error where is_redirect() is true
// -----------------------------------------------------------------------------
