//! Multi-factor confidence scoring.
//!
//! | Check              | Points  |
//! |--------------------|---------|
//! | Syntax             | 30      |
//! | Domain structure   | 20      |
//! | TLD                | 15      |
//! | Not blacklisted    | 15      |
//! | Known provider     | 10      |
//! | MX (optional)      | +10/−5  |
//!
//! The MX check only runs when lookups are enabled and the address already
//! scores at least [`MX_GATE`]. Results are memoized per domain for the life
//! of the [`Scorer`].

pub mod checks;
#[cfg(feature = "dns")]
pub mod dns;
pub mod mx;

use crate::core::config::ValidationConfig;
use crate::types::{MxStatus, ValidationDetails, ValidationOutcome};
use ahash::AHashSet;
use std::sync::Arc;

pub use checks::{CheckResult, check_blacklist, check_domain, check_syntax, check_tld};
#[cfg(feature = "dns")]
pub use dns::DnsMxResolver;
pub use mx::{MxCache, MxLookup, MxResolver, UnavailableResolver};

pub const SYNTAX_POINTS: i32 = 30;
pub const DOMAIN_POINTS: i32 = 20;
pub const TLD_POINTS: i32 = 15;
pub const BLACKLIST_POINTS: i32 = 15;
pub const KNOWN_PROVIDER_POINTS: i32 = 10;
pub const MX_PRESENT_POINTS: i32 = 10;
pub const MX_ABSENT_PENALTY: i32 = 5;

/// Minimum running confidence before an MX lookup is attempted, and the
/// minimum final confidence of a valid address.
pub const MX_GATE: i32 = 50;
pub const VALIDITY_THRESHOLD: u8 = 50;

struct MxCheck {
    resolver: Arc<dyn MxResolver>,
    cache: MxCache,
}

/// Scores addresses against one static [`ValidationConfig`].
pub struct Scorer {
    email_blacklist: AHashSet<String>,
    domain_blacklist: AHashSet<String>,
    known_valid_domains: AHashSet<String>,
    mx: Option<MxCheck>,
}

impl Scorer {
    /// Build a scorer, wiring the live DNS resolver when lookups are enabled.
    pub fn new(config: &ValidationConfig) -> Self {
        let resolver = config.enable_dns_lookup.then(|| default_resolver(config));
        Self::build(config, resolver)
    }

    /// Build a scorer with a caller-supplied resolver. Lookups still only run
    /// when `config.enable_dns_lookup` is set.
    pub fn with_resolver(config: &ValidationConfig, resolver: Arc<dyn MxResolver>) -> Self {
        let resolver = config.enable_dns_lookup.then_some(resolver);
        Self::build(config, resolver)
    }

    fn build(config: &ValidationConfig, resolver: Option<Arc<dyn MxResolver>>) -> Self {
        Self {
            email_blacklist: lowercase_set(&config.email_blacklist),
            domain_blacklist: lowercase_set(&config.domain_blacklist),
            known_valid_domains: lowercase_set(&config.known_valid_domains),
            mx: resolver.map(|resolver| MxCheck {
                resolver,
                cache: MxCache::new(config.mx_cache_capacity),
            }),
        }
    }

    pub fn dns_enabled(&self) -> bool {
        self.mx.is_some()
    }

    /// Number of domains currently memoized.
    pub fn cached_domains(&self) -> usize {
        self.mx.as_ref().map(|mx| mx.cache.len()).unwrap_or(0)
    }

    /// Score one address.
    pub async fn score(&self, address: &str) -> ValidationOutcome {
        let mut outcome = ValidationOutcome {
            address: address.to_string(),
            confidence: 0,
            is_valid: false,
            domain: String::new(),
            details: ValidationDetails::default(),
        };

        if address.is_empty() {
            outcome.details.issues.push("Empty email".to_string());
            return outcome;
        }

        let Some((_, domain)) = address.rsplit_once('@') else {
            outcome.details.issues.push("Invalid format - no @ symbol".to_string());
            return outcome;
        };
        let domain_lower = domain.to_lowercase();
        outcome.domain = domain_lower.clone();

        let details = &mut outcome.details;
        let mut confidence = 0;

        let syntax = check_syntax(address);
        details.syntax_valid = syntax.valid;
        confidence += absorb(syntax, SYNTAX_POINTS, &mut details.issues);

        let structure = check_domain(domain);
        details.domain_valid = structure.valid;
        confidence += absorb(structure, DOMAIN_POINTS, &mut details.issues);

        let tld = check_tld(domain);
        details.tld_valid = tld.valid;
        confidence += absorb(tld, TLD_POINTS, &mut details.issues);

        let blacklist = check_blacklist(address, domain, &self.email_blacklist, &self.domain_blacklist);
        details.not_blacklisted = blacklist.valid;
        confidence += absorb(blacklist, BLACKLIST_POINTS, &mut details.issues);

        if self.known_valid_domains.contains(&domain_lower) {
            confidence += KNOWN_PROVIDER_POINTS;
        }

        if confidence >= MX_GATE
            && let Some(mx) = &self.mx
        {
            let lookup = self.lookup_mx(mx, &domain_lower).await;
            details.mx_record = Some(lookup.status);
            match lookup.status {
                MxStatus::Present => {
                    confidence += MX_PRESENT_POINTS;
                    if let Some(note) = lookup.note {
                        details.issues.push(note);
                    }
                }
                MxStatus::Absent => {
                    confidence -= MX_ABSENT_PENALTY;
                    details.issues.push("No MX record found".to_string());
                }
                MxStatus::Unknown => {}
            }
        }

        outcome.confidence = confidence.clamp(0, 100) as u8;
        outcome.is_valid = details.syntax_valid
            && details.domain_valid
            && details.not_blacklisted
            && outcome.confidence >= VALIDITY_THRESHOLD;

        tracing::debug!(
            address,
            confidence = outcome.confidence,
            is_valid = outcome.is_valid,
            "Scored address"
        );
        outcome
    }

    /// Score several addresses in order.
    pub async fn validate_batch<S: AsRef<str>>(&self, addresses: &[S]) -> Vec<ValidationOutcome> {
        let mut outcomes = Vec::with_capacity(addresses.len());
        for address in addresses {
            outcomes.push(self.score(address.as_ref()).await);
        }
        outcomes
    }

    async fn lookup_mx(&self, mx: &MxCheck, domain: &str) -> MxLookup {
        if let Some(cached) = mx.cache.get(domain) {
            return cached;
        }

        let lookup = mx.resolver.lookup(domain).await;
        tracing::debug!(domain, status = ?lookup.status, "MX lookup");
        mx.cache.insert(domain, lookup.clone());
        lookup
    }
}

impl std::fmt::Debug for Scorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scorer")
            .field("email_blacklist", &self.email_blacklist.len())
            .field("domain_blacklist", &self.domain_blacklist.len())
            .field("known_valid_domains", &self.known_valid_domains.len())
            .field("dns_enabled", &self.dns_enabled())
            .finish()
    }
}

fn absorb(result: CheckResult, points: i32, issues: &mut Vec<String>) -> i32 {
    issues.extend(result.issues);
    if result.valid { points } else { 0 }
}

fn lowercase_set(items: &[String]) -> AHashSet<String> {
    items.iter().map(|item| item.trim().to_lowercase()).collect()
}

#[cfg(feature = "dns")]
fn default_resolver(config: &ValidationConfig) -> Arc<dyn MxResolver> {
    Arc::new(DnsMxResolver::new(std::time::Duration::from_secs(config.dns_timeout_secs)))
}

#[cfg(not(feature = "dns"))]
fn default_resolver(_config: &ValidationConfig) -> Arc<dyn MxResolver> {
    tracing::warn!("DNS lookup enabled but mailsift was built without the `dns` feature");
    Arc::new(UnavailableResolver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedResolver {
        lookup: MxLookup,
        calls: AtomicUsize,
    }

    impl FixedResolver {
        fn new(lookup: MxLookup) -> Arc<Self> {
            Arc::new(Self {
                lookup,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl MxResolver for FixedResolver {
        async fn lookup(&self, _domain: &str) -> MxLookup {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.lookup.clone()
        }
    }

    fn dns_config() -> ValidationConfig {
        ValidationConfig {
            enable_dns_lookup: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_known_provider_scores_ninety() {
        let scorer = Scorer::new(&ValidationConfig::default());
        let outcome = scorer.score("john.doe@gmail.com").await;
        assert_eq!(outcome.confidence, 90);
        assert!(outcome.is_valid);
        assert_eq!(outcome.domain, "gmail.com");
        assert_eq!(outcome.details.mx_record, None);
        assert!(outcome.details.issues.is_empty());
    }

    #[tokio::test]
    async fn test_empty_and_missing_at() {
        let scorer = Scorer::new(&ValidationConfig::default());

        let empty = scorer.score("").await;
        assert_eq!(empty.confidence, 0);
        assert_eq!(empty.details.issues, vec!["Empty email"]);

        let no_at = scorer.score("nodomain.com").await;
        assert_eq!(no_at.confidence, 0);
        assert!(!no_at.is_valid);
        assert_eq!(no_at.details.issues, vec!["Invalid format - no @ symbol"]);
    }

    #[tokio::test]
    async fn test_blacklisted_domain_is_invalid() {
        let scorer = Scorer::new(&ValidationConfig::default());
        let outcome = scorer.score("support@example.com").await;
        assert!(!outcome.is_valid);
        assert!(!outcome.details.not_blacklisted);
        assert!(
            outcome
                .details
                .issues
                .contains(&"Domain is blacklisted: example.com".to_string())
        );
        assert_eq!(outcome.confidence, 65);
    }

    #[tokio::test]
    async fn test_blacklist_is_case_insensitive() {
        let config = ValidationConfig {
            email_blacklist: vec!["Boss@Corp.com".to_string()],
            ..Default::default()
        };
        let scorer = Scorer::new(&config);
        assert!(!scorer.score("boss@corp.com").await.is_valid);
    }

    #[tokio::test]
    async fn test_unknown_tld_still_valid() {
        let scorer = Scorer::new(&ValidationConfig::default());
        let outcome = scorer.score("good@unknown-domain.xyz").await;
        assert_eq!(outcome.confidence, 80);
        assert!(outcome.is_valid);
        assert_eq!(outcome.details.issues, vec!["Uncommon TLD: .xyz"]);
    }

    #[tokio::test]
    async fn test_mx_present_adds_points_and_clamps() {
        let resolver = FixedResolver::new(MxLookup::present());
        let scorer = Scorer::with_resolver(&dns_config(), resolver.clone());

        let outcome = scorer.score("jane@gmail.com").await;
        assert_eq!(outcome.confidence, 100);
        assert_eq!(outcome.details.mx_record, Some(MxStatus::Present));
    }

    #[tokio::test]
    async fn test_mx_absent_penalizes() {
        let resolver = FixedResolver::new(MxLookup::absent());
        let scorer = Scorer::with_resolver(&dns_config(), resolver);

        let outcome = scorer.score("sales@acme.io").await;
        assert_eq!(outcome.confidence, 75);
        assert_eq!(outcome.details.mx_record, Some(MxStatus::Absent));
        assert!(outcome.details.issues.contains(&"No MX record found".to_string()));
    }

    #[tokio::test]
    async fn test_mx_unknown_leaves_confidence() {
        let resolver = FixedResolver::new(MxLookup::unknown("DNS lookup error: boom"));
        let scorer = Scorer::with_resolver(&dns_config(), resolver);

        let outcome = scorer.score("sales@acme.io").await;
        assert_eq!(outcome.confidence, 80);
        assert_eq!(outcome.details.mx_record, Some(MxStatus::Unknown));
        assert!(outcome.details.issues.is_empty());
    }

    #[tokio::test]
    async fn test_mx_skipped_below_gate() {
        let resolver = FixedResolver::new(MxLookup::present());
        let scorer = Scorer::with_resolver(&dns_config(), resolver.clone());

        let outcome = scorer.score("bad..dots@-x.zz9").await;
        assert!(outcome.confidence < 50);
        assert_eq!(outcome.details.mx_record, None);
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_mx_memoized_per_domain() {
        let resolver = FixedResolver::new(MxLookup::present());
        let scorer = Scorer::with_resolver(&dns_config(), resolver.clone());

        scorer.validate_batch(&["a@acme.io", "b@acme.io", "c@other.io"]).await;
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 2);
        assert_eq!(scorer.cached_domains(), 2);
    }

    #[tokio::test]
    async fn test_resolver_ignored_when_disabled() {
        let resolver = FixedResolver::new(MxLookup::absent());
        let scorer = Scorer::with_resolver(&ValidationConfig::default(), resolver.clone());

        assert!(!scorer.dns_enabled());
        assert_eq!(scorer.score("a@acme.io").await.details.mx_record, None);
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }
}
