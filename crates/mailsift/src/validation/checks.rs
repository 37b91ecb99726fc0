//! The independent structural and reputation checks behind a score.
//!
//! Each check reports pass/fail plus the issues it noticed. A check can pass
//! and still report an issue (an uncommon TLD, a suspicious prefix).

use ahash::AHashSet;
use once_cell::sync::Lazy;
use regex::Regex;

static STRUCTURE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("Address structure regex pattern is valid and should compile")
});

static LABEL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9-]+$").expect("Domain label regex pattern is valid and should compile"));

/// Prefixes that flag throwaway or role mailboxes. `admin@` is handled
/// separately because only `admin@real...` is exempt.
static SUSPICIOUS_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:test\d*|example\d*|no-?reply|spam|fake)@")
        .expect("Suspicious prefix regex pattern is valid and should compile")
});

pub const MAX_ADDRESS_CHARS: usize = 254;
pub const MAX_LOCAL_PART_CHARS: usize = 64;
pub const MAX_DOMAIN_CHARS: usize = 255;
pub const MAX_LABEL_CHARS: usize = 63;

/// Generic, sponsored and common country-code TLDs. Anything else still
/// passes the TLD check but is reported as uncommon.
pub const COMMON_TLDS: &[&str] = &[
    "com", "org", "net", "edu", "gov", "mil", "int", "info", "biz", "name", "pro", "aero", "coop", "museum", "jobs",
    "travel", "mobi", "cat", "tel", "asia", "app", "dev", "io", "co", "ai", "tech", "online", "store", "site", "cloud",
    "digital", "email", "company", "business", "us", "uk", "ca", "au", "de", "fr", "jp", "cn", "in", "br", "ru", "it",
    "es", "nl", "se", "no", "dk", "fi", "pl", "cz", "at", "ch", "be", "ie", "nz", "sg", "hk", "kr", "mx", "ar", "za",
    "ae", "il", "tr", "gr", "pt", "hu", "ro", "ua", "th", "my", "ph", "id", "vn", "pk", "eg", "ng", "ke", "gh",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckResult {
    pub valid: bool,
    pub issues: Vec<String>,
}

impl CheckResult {
    fn pass() -> Self {
        Self {
            valid: true,
            issues: Vec::new(),
        }
    }

    fn fail(issue: impl Into<String>) -> Self {
        Self {
            valid: false,
            issues: vec![issue.into()],
        }
    }
}

pub fn check_syntax(address: &str) -> CheckResult {
    if address.chars().count() > MAX_ADDRESS_CHARS {
        return CheckResult::fail("Email too long (max 254 chars)");
    }

    let Some((local, _)) = address.rsplit_once('@') else {
        return CheckResult::fail("Missing @ symbol");
    };

    if local.is_empty() {
        return CheckResult::fail("Empty local part");
    }
    if local.chars().count() > MAX_LOCAL_PART_CHARS {
        return CheckResult::fail("Local part too long (max 64 chars)");
    }
    if local.starts_with('.') || local.ends_with('.') {
        return CheckResult::fail("Local part cannot start or end with a dot");
    }
    if local.contains("..") {
        return CheckResult::fail("Local part contains consecutive dots");
    }
    if !STRUCTURE_PATTERN.is_match(address) {
        return CheckResult::fail("Invalid characters or format");
    }

    CheckResult::pass()
}

pub fn check_domain(domain: &str) -> CheckResult {
    if domain.is_empty() {
        return CheckResult::fail("Empty domain");
    }
    if domain.chars().count() > MAX_DOMAIN_CHARS {
        return CheckResult::fail("Domain too long");
    }
    if !domain.contains('.') {
        return CheckResult::fail("Domain must contain a dot");
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return CheckResult::fail("Empty label in domain");
        }
        if label.chars().count() > MAX_LABEL_CHARS {
            return CheckResult::fail(format!("Label too long: {}", label));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return CheckResult::fail("Label cannot start or end with hyphen");
        }
        if !LABEL_PATTERN.is_match(label) {
            return CheckResult::fail(format!("Invalid characters in label: {}", label));
        }
    }

    CheckResult::pass()
}

pub fn check_tld(domain: &str) -> CheckResult {
    let tld = domain.rsplit('.').next().unwrap_or_default().to_lowercase();

    if tld.is_empty() {
        return CheckResult::fail("Empty TLD");
    }
    if tld.chars().count() < 2 {
        return CheckResult::fail("TLD too short");
    }
    if tld.chars().all(|c| c.is_ascii_digit()) {
        return CheckResult::fail("TLD cannot be all numbers");
    }

    let mut result = CheckResult::pass();
    if !COMMON_TLDS.contains(&tld.as_str()) {
        result.issues.push(format!("Uncommon TLD: .{}", tld));
    }
    result
}

/// Blacklist sets are expected to hold lower-cased entries.
pub fn check_blacklist(
    address: &str,
    domain: &str,
    email_blacklist: &AHashSet<String>,
    domain_blacklist: &AHashSet<String>,
) -> CheckResult {
    let address_lower = address.to_lowercase();
    let domain_lower = domain.to_lowercase();

    if email_blacklist.contains(&address_lower) {
        return CheckResult::fail("Email is blacklisted");
    }
    if domain_blacklist.contains(&domain_lower) {
        return CheckResult::fail(format!("Domain is blacklisted: {}", domain));
    }

    let mut result = CheckResult::pass();
    if is_suspicious(&address_lower) {
        result.issues.push("Suspicious email pattern".to_string());
    }
    result
}

fn is_suspicious(address_lower: &str) -> bool {
    if SUSPICIOUS_PREFIX.is_match(address_lower) {
        return true;
    }
    address_lower
        .strip_prefix("admin@")
        .is_some_and(|rest| !rest.starts_with("real"))
}
