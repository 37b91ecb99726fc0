//! Mail-exchange lookups and their per-scorer memo.

use crate::types::MxStatus;
use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::Mutex;

/// Result of one lookup for one domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MxLookup {
    pub status: MxStatus,
    /// Extra observation worth surfacing (e.g. a fallback A record answered).
    pub note: Option<String>,
}

impl MxLookup {
    pub fn present() -> Self {
        Self {
            status: MxStatus::Present,
            note: None,
        }
    }

    pub fn absent() -> Self {
        Self {
            status: MxStatus::Absent,
            note: None,
        }
    }

    pub fn unknown(reason: impl Into<String>) -> Self {
        Self {
            status: MxStatus::Unknown,
            note: Some(reason.into()),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Answers "does this domain accept mail?".
///
/// Implementations never fail: a resolver that cannot tell reports
/// [`MxStatus::Unknown`].
#[async_trait]
pub trait MxResolver: Send + Sync {
    async fn lookup(&self, domain: &str) -> MxLookup;
}

/// Stand-in used when lookups are enabled but the crate was built without a
/// DNS backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableResolver;

#[async_trait]
impl MxResolver for UnavailableResolver {
    async fn lookup(&self, _domain: &str) -> MxLookup {
        MxLookup::unknown("DNS lookup unavailable")
    }
}

/// Bounded domain → lookup memo with first-in-first-out eviction.
#[derive(Debug)]
pub struct MxCache {
    entries: Mutex<IndexMap<String, MxLookup>>,
    capacity: usize,
}

impl MxCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(IndexMap::with_capacity(capacity.min(1024))),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, domain: &str) -> Option<MxLookup> {
        self.entries.lock().get(domain).cloned()
    }

    pub fn insert(&self, domain: impl Into<String>, lookup: MxLookup) {
        let mut entries = self.entries.lock();
        let domain = domain.into();
        if !entries.contains_key(&domain) && entries.len() >= self.capacity {
            entries.shift_remove_index(0);
        }
        entries.insert(domain, lookup);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
