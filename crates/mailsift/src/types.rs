//! Shared data model: document facts, recognized occurrences, scored records
//! and the per-job report handed back to callers.

use serde::{Deserialize, Serialize};

/// Facts about an opened PDF document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub page_count: usize,
    pub encrypted: bool,
    /// True when one of the first three pages carries an image XObject.
    pub has_images: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// One textual match of an address-shaped pattern.
///
/// Offsets are byte offsets into the normalized text the occurrence was
/// recognized in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateOccurrence {
    /// Substring exactly as matched.
    pub raw: String,
    /// Lower-cased, de-punctuated address.
    pub address: String,
    pub start: usize,
    pub end: usize,
    /// Up to 100 characters preceding the match, trimmed.
    pub before: String,
    /// Up to 100 characters following the match, trimmed.
    pub after: String,
    /// `"<before> [EMAIL] <after>"`, at most 200 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_hint: Option<String>,
}

impl CandidateOccurrence {
    pub fn domain(&self) -> &str {
        self.address.split_once('@').map(|(_, domain)| domain).unwrap_or_default()
    }
}

/// Outcome of a mail-exchange lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MxStatus {
    /// An MX (or fallback A) record answered.
    Present,
    /// The resolver answered authoritatively that nothing is there.
    Absent,
    /// Lookup unavailable, timed out or errored.
    Unknown,
}

/// Per-check breakdown of a validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDetails {
    pub syntax_valid: bool,
    pub domain_valid: bool,
    pub tld_valid: bool,
    pub not_blacklisted: bool,
    /// `None` when the lookup was not attempted.
    pub mx_record: Option<MxStatus>,
    pub issues: Vec<String>,
}

/// Confidence and verdict for a single address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub address: String,
    /// Always within 0..=100.
    pub confidence: u8,
    pub is_valid: bool,
    pub domain: String,
    pub details: ValidationDetails,
}

/// Human-readable bucket for a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLabel {
    VeryHigh,
    High,
    Medium,
    Low,
    VeryLow,
}

impl ConfidenceLabel {
    pub fn from_confidence(confidence: u8) -> Self {
        match confidence {
            90.. => Self::VeryHigh,
            75..=89 => Self::High,
            50..=74 => Self::Medium,
            25..=49 => Self::Low,
            _ => Self::VeryLow,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryHigh => "Very High",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::VeryLow => "Very Low",
        }
    }
}

impl std::fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate of every occurrence sharing one normalized address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub address: String,
    pub confidence: u8,
    pub is_valid: bool,
    pub domain: String,
    /// Always at least 1.
    pub occurrences: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_hint: Option<String>,
    pub validation_details: ValidationDetails,
}

impl EmailRecord {
    pub fn confidence_label(&self) -> ConfidenceLabel {
        ConfidenceLabel::from_confidence(self.confidence)
    }
}

/// An address seen more than once across a job's documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateEntry {
    pub address: String,
    pub count: usize,
    pub domain: String,
}

/// A document that could not be scanned inside a multi-document job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedDocument {
    pub name: String,
    pub error: String,
}

/// Everything a job produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Sorted by confidence, highest first.
    pub records: Vec<EmailRecord>,
    /// Sorted by occurrence count, highest first.
    pub duplicates: Vec<DuplicateEntry>,
    pub total_emails: usize,
    pub valid_emails: usize,
    pub invalid_emails: usize,
    pub files_processed: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub files_failed: Vec<FailedDocument>,
    pub processing_time_secs: f64,
}
