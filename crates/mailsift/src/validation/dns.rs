//! Live MX resolver over the system's Tokio DNS stack.

use super::mx::{MxLookup, MxResolver};
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use std::time::Duration;
use trust_dns_resolver::TokioAsyncResolver;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};

/// Resolves MX records, falling back to A records when a domain publishes none.
///
/// The whole lookup (MX plus fallback) is bounded by `timeout`; running out of
/// time is reported as unknown rather than absent.
pub struct DnsMxResolver {
    resolver: OnceCell<TokioAsyncResolver>,
    timeout: Duration,
}

impl DnsMxResolver {
    pub fn new(timeout: Duration) -> Self {
        Self {
            resolver: OnceCell::new(),
            timeout,
        }
    }

    fn resolver(&self) -> &TokioAsyncResolver {
        self.resolver.get_or_init(|| {
            let mut opts = ResolverOpts::default();
            opts.timeout = self.timeout;
            opts.attempts = 1;
            TokioAsyncResolver::tokio(ResolverConfig::default(), opts)
        })
    }

    async fn resolve(&self, domain: &str) -> MxLookup {
        let resolver = self.resolver();

        match resolver.mx_lookup(domain).await {
            Ok(records) if records.iter().next().is_some() => return MxLookup::present(),
            Ok(_) => {}
            Err(err) if is_no_records(&err) => {}
            Err(err) => {
                tracing::warn!(domain, error = %err, "MX lookup failed");
                return MxLookup::unknown(format!("DNS lookup error: {}", err));
            }
        }

        match resolver.ipv4_lookup(domain).await {
            Ok(records) if records.iter().next().is_some() => {
                MxLookup::present().with_note("No MX record, but A record exists")
            }
            Ok(_) => MxLookup::absent(),
            Err(err) if is_no_records(&err) => MxLookup::absent(),
            Err(err) => {
                tracing::debug!(domain, error = %err, "A-record fallback failed");
                MxLookup::absent()
            }
        }
    }
}

fn is_no_records(err: &ResolveError) -> bool {
    matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. })
}

#[async_trait]
impl MxResolver for DnsMxResolver {
    async fn lookup(&self, domain: &str) -> MxLookup {
        match tokio::time::timeout(self.timeout, self.resolve(domain)).await {
            Ok(lookup) => lookup,
            Err(_) => {
                tracing::warn!(domain, timeout_secs = self.timeout.as_secs(), "MX lookup timed out");
                MxLookup::unknown("DNS lookup error: timed out")
            }
        }
    }
}

impl std::fmt::Debug for DnsMxResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsMxResolver").field("timeout", &self.timeout).finish()
    }
}
