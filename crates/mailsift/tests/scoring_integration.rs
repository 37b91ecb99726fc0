//! Scorer integration tests with a scripted MX resolver.

use async_trait::async_trait;
use mailsift::core::config::ValidationConfig;
use mailsift::validation::{MxLookup, MxResolver, Scorer};
use mailsift::{MailsiftConfig, MxStatus, check_addresses};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct ScriptedResolver {
    calls: AtomicUsize,
}

#[async_trait]
impl MxResolver for ScriptedResolver {
    async fn lookup(&self, domain: &str) -> MxLookup {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match domain {
            "acme.io" => MxLookup::present(),
            "fallback.io" => MxLookup::present().with_note("No MX record, but A record exists"),
            "ghost.io" => MxLookup::absent(),
            _ => MxLookup::unknown("timed out"),
        }
    }
}

fn dns_config() -> ValidationConfig {
    ValidationConfig {
        enable_dns_lookup: true,
        ..Default::default()
    }
}

fn scorer_with(resolver: Arc<ScriptedResolver>) -> Scorer {
    Scorer::with_resolver(&dns_config(), resolver)
}

#[tokio::test]
async fn test_mx_present_adds_points() {
    let scorer = scorer_with(Arc::new(ScriptedResolver::default()));
    let outcome = scorer.score("sales@acme.io").await;

    assert_eq!(outcome.confidence, 90);
    assert_eq!(outcome.details.mx_record, Some(MxStatus::Present));
    assert!(outcome.is_valid);
}

#[tokio::test]
async fn test_mx_absent_subtracts_points() {
    let scorer = scorer_with(Arc::new(ScriptedResolver::default()));
    let outcome = scorer.score("sales@ghost.io").await;

    assert_eq!(outcome.confidence, 75);
    assert_eq!(outcome.details.mx_record, Some(MxStatus::Absent));
    assert!(outcome.details.issues.iter().any(|i| i == "No MX record found"));
}

#[tokio::test]
async fn test_mx_unknown_leaves_score_unchanged() {
    let scorer = scorer_with(Arc::new(ScriptedResolver::default()));
    let outcome = scorer.score("sales@silent.io").await;

    assert_eq!(outcome.confidence, 80);
    assert_eq!(outcome.details.mx_record, Some(MxStatus::Unknown));
}

#[tokio::test]
async fn test_a_record_fallback_is_noted() {
    let scorer = scorer_with(Arc::new(ScriptedResolver::default()));
    let outcome = scorer.score("info@fallback.io").await;

    assert_eq!(outcome.confidence, 90);
    assert!(outcome.details.issues.iter().any(|i| i.contains("A record")));
}

#[tokio::test]
async fn test_lookups_are_memoized_per_domain() {
    let resolver = Arc::new(ScriptedResolver::default());
    let scorer = scorer_with(Arc::clone(&resolver));

    scorer
        .validate_batch(&["a@acme.io", "b@acme.io", "c@ACME.io", "d@ghost.io"])
        .await;

    assert_eq!(resolver.calls.load(Ordering::SeqCst), 2);
    assert_eq!(scorer.cached_domains(), 2);
}

#[tokio::test]
async fn test_low_scores_skip_lookup() {
    let resolver = Arc::new(ScriptedResolver::default());
    let scorer = scorer_with(Arc::clone(&resolver));

    // Broken structure leaves it well under the gate.
    let outcome = scorer.score("x@-bad.test.com").await;

    assert!(outcome.confidence < 50);
    assert_eq!(outcome.details.mx_record, None);
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_resolver_ignored_when_lookups_disabled() {
    let resolver = Arc::new(ScriptedResolver::default());
    let scorer = Scorer::with_resolver(&ValidationConfig::default(), resolver.clone());

    let outcome = scorer.score("sales@acme.io").await;
    assert!(!scorer.dns_enabled());
    assert_eq!(outcome.confidence, 80);
    assert_eq!(outcome.details.mx_record, None);
    assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_custom_blacklists_and_providers() {
    let config = ValidationConfig {
        email_blacklist: vec!["Spammer@Acme.io".to_string()],
        domain_blacklist: vec!["junk.net".to_string()],
        known_valid_domains: vec!["acme.io".to_string()],
        ..Default::default()
    };
    let scorer = Scorer::new(&config);

    let blocked = scorer.score("spammer@acme.io").await;
    assert!(!blocked.details.not_blacklisted);
    assert!(!blocked.is_valid);
    assert!(blocked.details.issues.iter().any(|i| i == "Email is blacklisted"));

    let junk = scorer.score("hello@junk.net").await;
    assert_eq!(junk.confidence, 65);
    assert!(!junk.is_valid);

    let known = scorer.score("hello@acme.io").await;
    assert_eq!(known.confidence, 90);
}

#[tokio::test]
async fn test_suspicious_prefixes_keep_points() {
    let scorer = Scorer::new(&ValidationConfig::default());

    let noreply = scorer.score("noreply@acme.io").await;
    assert_eq!(noreply.confidence, 80);
    assert!(noreply.details.issues.iter().any(|i| i == "Suspicious email pattern"));

    let admin = scorer.score("admin@acme.io").await;
    assert!(admin.details.issues.iter().any(|i| i == "Suspicious email pattern"));

    let real_admin = scorer.score("admin@realestate.com").await;
    assert!(real_admin.details.issues.is_empty());
}

#[tokio::test]
async fn test_degenerate_inputs() {
    let scorer = Scorer::new(&ValidationConfig::default());

    let empty = scorer.score("").await;
    assert_eq!(empty.confidence, 0);
    assert_eq!(empty.details.issues, vec!["Empty email"]);

    let no_at = scorer.score("plainaddress").await;
    assert_eq!(no_at.confidence, 0);
    assert!(!no_at.is_valid);
}

#[tokio::test]
async fn test_check_addresses_preserves_order() {
    let outcomes = check_addresses(&["b@acme.io", "john.doe@gmail.com", "bad@@x"], &MailsiftConfig::default())
        .await
        .unwrap();

    let addresses: Vec<&str> = outcomes.iter().map(|o| o.address.as_str()).collect();
    assert_eq!(addresses, vec!["b@acme.io", "john.doe@gmail.com", "bad@@x"]);
    assert_eq!(outcomes[1].confidence, 90);
    assert!(!outcomes[2].is_valid);
}
