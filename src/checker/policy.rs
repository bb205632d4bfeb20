// src/checker/policy.rs
// =============================================================================
// The domain exception list.
//
// A handful of sites run aggressive bot protection: they refuse automated
// requests (403, 999, connection resets) while working fine in a browser.
// Probing them would only produce false "dead link" reports, so any URL that
// mentions one of these domains is skipped entirely.
//
// The list is fixed at compile time. Adding a domain means editing
// BOT_PROTECTED_DOMAINS below.
// =============================================================================

/// Domains known to reject automated link checkers
pub const BOT_PROTECTED_DOMAINS: &[&str] = &["facebook.com", "www.facebook.com"];

// Immutable list of substring patterns
//
// Built once at the start of a run and shared read-only with every probe task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainPolicy {
    patterns: Vec<String>,
}

impl DomainPolicy {
    /// Builds a policy from an explicit pattern list
    ///
    /// Only tests need this; production runs use `DomainPolicy::default()`.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the URL contains any known bot-protected domain
    ///
    /// This is a plain substring test: "https://m.facebook.com/x" and
    /// "https://example.com/?ref=facebook.com" are both skipped.
    pub fn should_skip(&self, url: &str) -> bool {
        self.patterns.iter().any(|pattern| url.contains(pattern.as_str()))
    }
}

impl Default for DomainPolicy {
    fn default() -> Self {
        Self::new(BOT_PROTECTED_DOMAINS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_facebook() {
        let policy = DomainPolicy::default();
        assert!(policy.should_skip("https://www.facebook.com/groups/ridewestside"));
        assert!(policy.should_skip("https://facebook.com/events/123"));
    }

    #[test]
    fn test_does_not_skip_other_domains() {
        let policy = DomainPolicy::default();
        assert!(!policy.should_skip("https://ridewithgps.com/routes/1"));
        assert!(!policy.should_skip("https://www.shift2bikes.org/calendar"));
    }

    #[test]
    fn test_matches_substring_anywhere() {
        let policy = DomainPolicy::default();
        assert!(policy.should_skip("https://example.com/?share=facebook.com"));
    }

    #[test]
    fn test_empty_policy_skips_nothing() {
        let policy = DomainPolicy::new(Vec::<String>::new());
        assert!(!policy.should_skip("https://facebook.com"));
        assert_ne!(policy, DomainPolicy::default());
    }
}
