//! Candidate address recognition with context.
//!
//! Both entry points share one scan: a single left-to-right pass of the
//! address pattern over the normalized text, where every matched span starts
//! strictly after the previous one ends. Context windows are cut from the text
//! independently of that scan, so two neighbouring addresses may share context
//! without either being matched twice.

use super::hints::{company_hint, name_hint};
use super::normalize::Normalizer;
use crate::types::CandidateOccurrence;
use ahash::AHashSet;
use once_cell::sync::Lazy;
use regex::Regex;

/// `local-part @ domain . tld(>= 2 letters)`
static ADDRESS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}")
        .expect("Address regex pattern is valid and should compile")
});

pub const CONTEXT_WINDOW_CHARS: usize = 100;
pub const CONTEXT_MAX_CHARS: usize = 200;

const SURROUNDING_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', '\'', '"', '<', '>', '(', ')', '[', ']', '{', '}',
];

/// Every address-shaped substring of `text`, in order, as written.
pub fn find_address_shaped(text: &str) -> impl Iterator<Item = &str> {
    ADDRESS_PATTERN.find_iter(text).map(|m| m.as_str())
}

/// Lower-case, strip surrounding whitespace and punctuation, drop inner whitespace.
pub fn normalize_address(raw: &str) -> String {
    raw.to_lowercase()
        .trim()
        .trim_matches(SURROUNDING_PUNCTUATION)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Cheap structural filter separating plausible addresses from noise.
pub fn passes_basic_filter(address: &str) -> bool {
    if address.len() < 5 {
        return false;
    }

    let mut parts = address.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    if local.is_empty() || local.len() > 64 {
        return false;
    }
    if domain.is_empty() || !domain.contains('.') {
        return false;
    }

    let tld = domain.rsplit('.').next().unwrap_or_default();
    tld.chars().count() >= 2 && tld.chars().all(|c| c.is_alphabetic())
}

/// Finds candidate addresses in free text.
#[derive(Debug, Clone, Default)]
pub struct Recognizer {
    normalizer: Normalizer,
}

impl Recognizer {
    pub fn new() -> Self {
        Self {
            normalizer: Normalizer::new(),
        }
    }

    /// Every occurrence in text order, duplicates included.
    pub fn recognize_all(&self, text: &str) -> Vec<CandidateOccurrence> {
        if text.is_empty() {
            return Vec::new();
        }

        let normalized = self.normalizer.normalize(text);
        let occurrences: Vec<CandidateOccurrence> = ADDRESS_PATTERN
            .find_iter(&normalized)
            .filter_map(|m| build_occurrence(&normalized, m.start(), m.end()))
            .collect();

        tracing::debug!(count = occurrences.len(), "Recognized address occurrences (with duplicates)");
        occurrences
    }

    /// The first occurrence of each distinct address, in first-seen order.
    pub fn recognize_unique(&self, text: &str) -> Vec<CandidateOccurrence> {
        let mut seen = AHashSet::new();
        let unique: Vec<CandidateOccurrence> = self
            .recognize_all(text)
            .into_iter()
            .filter(|occurrence| seen.insert(occurrence.address.clone()))
            .collect();

        tracing::debug!(count = unique.len(), "Recognized unique addresses");
        unique
    }

    /// Sorted, de-duplicated addresses without context.
    pub fn extract_simple(&self, text: &str) -> Vec<String> {
        let normalized = self.normalizer.normalize(text);
        let mut addresses: Vec<String> = find_address_shaped(&normalized)
            .map(normalize_address)
            .filter(|address| passes_basic_filter(address))
            .collect();
        addresses.sort();
        addresses.dedup();
        addresses
    }
}

fn build_occurrence(text: &str, start: usize, end: usize) -> Option<CandidateOccurrence> {
    let raw = &text[start..end];
    let address = normalize_address(raw);
    if !passes_basic_filter(&address) {
        return None;
    }

    let before = text[window_start(text, start)..start].trim().to_string();
    let after = text[end..window_end(text, end)].trim().to_string();
    let context = truncate_chars(format!("{} [EMAIL] {}", before, after).trim(), CONTEXT_MAX_CHARS);

    let name_hint = name_hint(&before);
    let company_hint = company_hint(&before, &after, &address);

    Some(CandidateOccurrence {
        raw: raw.to_string(),
        address,
        start,
        end,
        before,
        after,
        context: Some(context),
        name_hint,
        company_hint,
    })
}

fn window_start(text: &str, start: usize) -> usize {
    text[..start]
        .char_indices()
        .rev()
        .take(CONTEXT_WINDOW_CHARS)
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(start)
}

fn window_end(text: &str, end: usize) -> usize {
    text[end..]
        .char_indices()
        .nth(CONTEXT_WINDOW_CHARS)
        .map(|(idx, _)| end + idx)
        .unwrap_or(text.len())
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
