// src/checker/dispatch.rs
// =============================================================================
// This module runs the prober over the whole URL Set, a few links at a time.
//
// How it works:
// 1. Links matching the domain exception list are reported as skipped and
//    never probed
// 2. Every remaining link gets its own tokio task
// 3. A semaphore with `concurrency` permits decides how many of those tasks
//    may have a request in flight; the rest wait for a permit
// 4. Each task reports its verdict as soon as it has one, and dead links
//    are pushed into a mutex-protected list
// 5. We wait for every task to finish before building the Report
//
// Rust concepts:
// - Arc: shared ownership of the prober, semaphore and dead list across tasks
// - tokio::sync::Semaphore: the admission ceiling
// - JoinSet: structured join, so no task outlives this function
// =============================================================================

use log::debug;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::html::UrlSet;
use super::http::{Probe, Reason, Verdict};
use super::policy::DomainPolicy;
use crate::report::{DeadLink, Report, Reporter};

// Probes every URL in the set and returns the aggregate Report
//
// Parameters:
//   urls: the deduplicated URL Set
//   policy: domains to skip instead of probing
//   prober: shared prober (HttpProber in production)
//   concurrency: maximum number of probes in flight at once
//   reporter: receives one progress line per URL as verdicts arrive
//
// Returns: a Report whose `dead` list holds exactly the unreachable URLs,
// sorted by URL. Per-URL failures never become errors here.
pub async fn dispatch(
    urls: &UrlSet,
    policy: &DomainPolicy,
    prober: Arc<dyn Probe>,
    concurrency: usize,
    reporter: Arc<Reporter>,
) -> Report {
    // A zero-permit semaphore would hang forever
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let dead = Arc::new(Mutex::new(Vec::<DeadLink>::new()));

    let mut skipped = Vec::new();
    let mut tasks = JoinSet::new();

    for url in urls {
        if policy.should_skip(url) {
            reporter.skipped(url);
            skipped.push(url.clone());
            continue;
        }

        let url = url.clone();
        let semaphore = Arc::clone(&semaphore);
        let prober = Arc::clone(&prober);
        let dead = Arc::clone(&dead);
        let reporter = Arc::clone(&reporter);

        tasks.spawn(async move {
            // The permit is released when `_permit` drops at the end of the
            // match arm, whatever the probe returned.
            let verdict = match semaphore.acquire().await {
                Ok(_permit) => prober.probe(&url).await,
                Err(_) => Verdict::Unreachable(Reason::Transport(
                    "probe pool shut down".to_string(),
                )),
            };

            match verdict {
                Verdict::Reachable => {
                    reporter.reachable(&url);
                    true
                }
                Verdict::Unreachable(reason) => {
                    debug!("dead link {url}: {reason}");
                    reporter.dead(&url);
                    dead.lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(DeadLink {
                            url,
                            reason: reason.to_string(),
                        });
                    false
                }
            }
        });
    }

    let checked = tasks.len();
    let mut reachable = 0;

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(true) => reachable += 1,
            Ok(false) => {}
            // A panicking probe is a bug, not a dead link
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => debug!("probe task cancelled: {e}"),
        }
    }

    // Every task has been joined, so this is the only handle left
    let mut dead = std::mem::take(&mut *dead.lock().unwrap_or_else(PoisonError::into_inner));
    dead.sort();

    Report {
        checked,
        reachable,
        skipped,
        dead,
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a semaphore instead of buffer_unordered?
//    - Both cap concurrency
//    - With a semaphore each URL is its own task, so a slow server only
//      holds one permit and the other slots keep moving
//
// 2. Why std::sync::Mutex inside async code?
//    - The lock is held for a single Vec::push, never across an .await
//    - For short critical sections like that, the std mutex is the right tool
//
// 3. What does JoinSet::join_next do?
//    - Waits for the next task to finish, in completion order
//    - Returns None once every task has been joined; that's our barrier
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::capture;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    // Records every call and how many probes overlapped
    #[derive(Default)]
    struct CountingProber {
        calls: Mutex<Vec<String>>,
        active: AtomicUsize,
        max_active: AtomicUsize,
        dead: HashMap<String, Reason>,
        delay: Duration,
    }

    #[async_trait]
    impl Probe for CountingProber {
        async fn probe(&self, url: &str) -> Verdict {
            self.calls.lock().unwrap().push(url.to_string());
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(self.delay).await;

            self.active.fetch_sub(1, Ordering::SeqCst);
            match self.dead.get(url) {
                Some(reason) => Verdict::Unreachable(reason.clone()),
                None => Verdict::Reachable,
            }
        }
    }

    fn url_set(urls: &[&str]) -> UrlSet {
        urls.iter().map(|u| u.to_string()).collect()
    }

    fn quiet_reporter() -> Arc<Reporter> {
        Arc::new(capture(false).0)
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_ceiling() {
        let urls: UrlSet = (0..25).map(|i| format!("https://site{i}.example/")).collect();
        let prober = Arc::new(CountingProber {
            delay: Duration::from_millis(20),
            ..Default::default()
        });

        let report = dispatch(
            &urls,
            &DomainPolicy::default(),
            prober.clone(),
            5,
            quiet_reporter(),
        )
        .await;

        assert_eq!(prober.calls.lock().unwrap().len(), 25);
        let max = prober.max_active.load(Ordering::SeqCst);
        assert!(max <= 5, "observed {max} concurrent probes");
        assert!(max > 1, "probes never overlapped");
        assert_eq!(report.checked, 25);
        assert_eq!(report.reachable, 25);
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_skipped_domains_are_never_probed() {
        let urls = url_set(&[
            "https://www.facebook.com/ridewestside",
            "https://ridewithgps.com/routes/1",
        ]);
        let mut dead = HashMap::new();
        dead.insert(
            "https://www.facebook.com/ridewestside".to_string(),
            Reason::HttpStatus(403),
        );
        let prober = Arc::new(CountingProber {
            dead,
            ..Default::default()
        });

        let (reporter, progress, _) = capture(false);
        let report = dispatch(
            &urls,
            &DomainPolicy::default(),
            prober.clone(),
            5,
            Arc::new(reporter),
        )
        .await;

        assert_eq!(
            *prober.calls.lock().unwrap(),
            vec!["https://ridewithgps.com/routes/1".to_string()]
        );
        assert_eq!(report.skipped, vec!["https://www.facebook.com/ridewestside"]);
        assert!(report.dead.is_empty());
        assert_eq!(report.checked, 1);
        assert!(progress
            .contents()
            .contains("  ⊘ https://www.facebook.com/ridewestside (skipped - bot protection)"));
    }

    #[tokio::test]
    async fn test_every_url_gets_exactly_one_disposition() {
        let urls = url_set(&[
            "https://a.example",
            "https://b.example",
            "https://c.example",
            "https://facebook.com/x",
            "https://d.example",
        ]);
        let dead: HashMap<_, _> = [
            ("https://b.example".to_string(), Reason::HttpStatus(404)),
            ("https://d.example".to_string(), Reason::Timeout),
        ]
        .into_iter()
        .collect();
        let prober = Arc::new(CountingProber {
            dead,
            delay: Duration::from_millis(5),
            ..Default::default()
        });

        let report = dispatch(
            &urls,
            &DomainPolicy::default(),
            prober,
            2,
            quiet_reporter(),
        )
        .await;

        assert_eq!(report.reachable + report.dead.len() + report.skipped.len(), urls.len());
        assert_eq!(
            report.dead,
            vec![
                DeadLink {
                    url: "https://b.example".into(),
                    reason: "HTTP 404".into()
                },
                DeadLink {
                    url: "https://d.example".into(),
                    reason: "request timed out".into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_dead_set_is_deterministic_across_runs() {
        let urls: UrlSet = (0..12).map(|i| format!("https://host{i}.example/")).collect();
        let dead: HashMap<_, _> = (0..12)
            .filter(|i| i % 3 == 0)
            .map(|i| (format!("https://host{i}.example/"), Reason::HttpStatus(500)))
            .collect();

        let mut runs = Vec::new();
        for _ in 0..3 {
            let prober = Arc::new(CountingProber {
                dead: dead.clone(),
                delay: Duration::from_millis(1),
                ..Default::default()
            });
            let report =
                dispatch(&urls, &DomainPolicy::default(), prober, 5, quiet_reporter()).await;
            runs.push(report.dead);
        }

        assert_eq!(runs[0].len(), 4);
        assert_eq!(runs[0], runs[1]);
        assert_eq!(runs[1], runs[2]);
    }

    #[tokio::test]
    async fn test_empty_url_set() {
        let prober = Arc::new(CountingProber::default());
        let report = dispatch(
            &UrlSet::new(),
            &DomainPolicy::default(),
            prober.clone(),
            5,
            quiet_reporter(),
        )
        .await;

        assert_eq!(report, Report::default());
        assert!(prober.calls.lock().unwrap().is_empty());
    }
}
