//! Job-level orchestration: extract → recognize → aggregate → score → rank.
//!
//! Documents of one job run strictly one after another. Extraction of each
//! document happens on the blocking pool; recognition, aggregation and scoring
//! run on the calling task once the text is back.

use crate::core::config::MailsiftConfig;
use crate::core::io::{read_document, validate_document_bytes};
use crate::extraction::{ExtractionPipeline, ExtractionResult, StrategyKind, UNION_HEADER};
use crate::recognition::Recognizer;
use crate::types::{CandidateOccurrence, DuplicateEntry, EmailRecord, FailedDocument, ScanReport};
use crate::validation::Scorer;
use crate::{MailsiftError, Result};
use ahash::AHashSet;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// A document handed to a job.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    Path(PathBuf),
    Bytes { name: String, bytes: Arc<Vec<u8>> },
}

impl DocumentSource {
    pub fn bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::Bytes {
            name: name.into(),
            bytes: Arc::new(bytes),
        }
    }

    /// File name shown in progress messages and `files_processed`.
    pub fn name(&self) -> String {
        match self {
            Self::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Bytes { name, .. } => name.clone(),
        }
    }

    async fn load(&self) -> Result<Arc<Vec<u8>>> {
        match self {
            Self::Path(path) => Ok(Arc::new(read_document(path).await?)),
            Self::Bytes { bytes, .. } => {
                validate_document_bytes(bytes)?;
                Ok(Arc::clone(bytes))
            }
        }
    }
}

impl From<PathBuf> for DocumentSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&std::path::Path> for DocumentSource {
    fn from(path: &std::path::Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

/// Snapshot of a running scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanProgress {
    pub current_page: usize,
    pub total_pages: usize,
    pub message: String,
}

/// Receives progress from a scan.
///
/// Called from the blocking worker while a document is being extracted, and
/// from the scan task otherwise.
pub trait ScanObserver: Send + Sync {
    fn progress(&self, update: ScanProgress);
}

impl<F> ScanObserver for F
where
    F: Fn(ScanProgress) + Send + Sync,
{
    fn progress(&self, update: ScanProgress) {
        self(update)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {
    fn progress(&self, _update: ScanProgress) {}
}

/// Occurrences merged by normalized address, in first-seen order.
#[derive(Debug, Default)]
pub struct Aggregator {
    entries: IndexMap<String, (CandidateOccurrence, usize)>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge occurrences; the first occurrence of an address keeps its context
    /// and hints.
    pub fn add(&mut self, occurrences: impl IntoIterator<Item = CandidateOccurrence>) {
        for occurrence in occurrences {
            self.entries
                .entry(occurrence.address.clone())
                .and_modify(|(_, count)| *count += 1)
                .or_insert((occurrence, 1));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, address: &str) -> usize {
        self.entries.get(address).map(|(_, count)| *count).unwrap_or(0)
    }

    /// Score every unique address and rank the results.
    pub async fn finish(self, scorer: &Scorer) -> (Vec<EmailRecord>, Vec<DuplicateEntry>) {
        let mut records = Vec::with_capacity(self.entries.len());
        let mut duplicates = Vec::new();

        for (address, (first, count)) in self.entries {
            let outcome = scorer.score(&address).await;

            if count > 1 {
                duplicates.push(DuplicateEntry {
                    address: address.clone(),
                    count,
                    domain: outcome.domain.clone(),
                });
            }

            records.push(EmailRecord {
                address,
                confidence: outcome.confidence,
                is_valid: outcome.is_valid,
                domain: outcome.domain,
                occurrences: count,
                context: first.context,
                name_hint: first.name_hint,
                company_hint: first.company_hint,
                validation_details: outcome.details,
            });
        }

        // Stable sorts: ties keep first-seen order.
        records.sort_by(|a, b| b.confidence.cmp(&a.confidence));
        duplicates.sort_by(|a, b| b.count.cmp(&a.count));

        (records, duplicates)
    }
}

/// Fill the totals of a report from its records.
fn summarize(
    records: Vec<EmailRecord>,
    duplicates: Vec<DuplicateEntry>,
    files_processed: Vec<String>,
    files_failed: Vec<FailedDocument>,
    started: Instant,
) -> ScanReport {
    let valid_emails = records.iter().filter(|r| r.is_valid).count();
    ScanReport {
        total_emails: records.len(),
        valid_emails,
        invalid_emails: records.len() - valid_emails,
        records,
        duplicates,
        files_processed,
        files_failed,
        processing_time_secs: started.elapsed().as_secs_f64(),
    }
}

fn page_message(prefix: &str, current: usize, total: usize) -> String {
    format!("{}Processing page {} of {}...", prefix, current, total)
}

/// Wires the pipeline, recognizer and scorer together for one or more jobs.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    pipeline: Arc<ExtractionPipeline>,
    recognizer: Recognizer,
    scorer: Arc<Scorer>,
}

impl Orchestrator {
    /// Build the standard components from `config`.
    pub fn new(config: &MailsiftConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_components(
            ExtractionPipeline::from_config(config)?,
            Scorer::new(&config.validation),
        ))
    }

    pub fn with_components(pipeline: ExtractionPipeline, scorer: Scorer) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            recognizer: Recognizer::new(),
            scorer: Arc::new(scorer),
        }
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Scan `documents` in order and produce one merged report.
    ///
    /// # Errors
    ///
    /// With a single document, a missing or non-PDF input fails the scan. With
    /// several, such a document is recorded in `files_failed` and skipped.
    pub async fn scan(&self, documents: &[DocumentSource], observer: Arc<dyn ScanObserver>) -> Result<ScanReport> {
        let started = Instant::now();
        let multi = documents.len() > 1;
        let mut aggregator = Aggregator::new();
        let mut files_processed = Vec::new();
        let mut files_failed = Vec::new();

        for (index, document) in documents.iter().enumerate() {
            let name = document.name();
            let prefix = if multi {
                format!("File {}/{} ({}): ", index + 1, documents.len(), name)
            } else {
                String::new()
            };

            match self.extract_document(document, &prefix, Arc::clone(&observer)).await {
                Ok(extraction) => {
                    let occurrences = self.recognize_document(&extraction);
                    tracing::info!(
                        document = %name,
                        strategy = ?extraction.strategy,
                        skipped = ?extraction.skipped,
                        weight = extraction.content_weight,
                        occurrences = occurrences.len(),
                        "Document scanned"
                    );
                    aggregator.add(occurrences);
                    files_processed.push(name);
                }
                Err(err) if multi && (err.is_input_error() || matches!(err, MailsiftError::Io(_))) => {
                    tracing::warn!(document = %name, error = %err, "Skipping document");
                    files_failed.push(FailedDocument {
                        name,
                        error: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        observer.progress(ScanProgress {
            current_page: 0,
            total_pages: 0,
            message: format!("Validating {} unique addresses...", aggregator.len()),
        });

        let (records, duplicates) = aggregator.finish(&self.scorer).await;
        Ok(summarize(records, duplicates, files_processed, files_failed, started))
    }

    /// Occurrences in one document's text. The address block that closes OCR
    /// output only contributes addresses its page prose never showed.
    fn recognize_document(&self, extraction: &ExtractionResult) -> Vec<CandidateOccurrence> {
        let text = extraction.text.as_str();
        let block_start = match extraction.strategy {
            Some(StrategyKind::Ocr) => text.rfind(UNION_HEADER),
            _ => None,
        };
        let Some(block_start) = block_start else {
            return self.recognizer.recognize_all(text);
        };

        let mut occurrences = self.recognizer.recognize_all(&text[..block_start]);
        let in_prose: AHashSet<String> = occurrences.iter().map(|o| o.address.clone()).collect();
        occurrences.extend(
            self.recognizer
                .recognize_all(&text[block_start..])
                .into_iter()
                .filter(|o| !in_prose.contains(&o.address)),
        );
        occurrences
    }

    async fn extract_document(
        &self,
        document: &DocumentSource,
        prefix: &str,
        observer: Arc<dyn ScanObserver>,
    ) -> Result<ExtractionResult> {
        let bytes = document.load().await?;
        let pipeline = Arc::clone(&self.pipeline);
        let prefix = prefix.to_string();

        tokio::task::spawn_blocking(move || {
            let total_pages = page_count(&bytes);
            observer.progress(ScanProgress {
                current_page: 0,
                total_pages,
                message: page_message(&prefix, 0, total_pages),
            });

            let sink = |current: usize, total: usize| {
                observer.progress(ScanProgress {
                    current_page: current,
                    total_pages: total,
                    message: page_message(&prefix, current, total),
                });
            };
            pipeline.extract(&bytes, &sink)
        })
        .await?
    }
}

#[cfg(feature = "pdf")]
fn page_count(bytes: &[u8]) -> usize {
    match crate::pdf::probe(bytes) {
        Ok(info) => {
            tracing::debug!(
                pages = info.page_count,
                encrypted = info.encrypted,
                has_images = info.has_images,
                title = ?info.title,
                "Probed document"
            );
            info.page_count
        }
        Err(err) => {
            tracing::debug!(error = %err, "Document probe failed");
            0
        }
    }
}

#[cfg(not(feature = "pdf"))]
fn page_count(_bytes: &[u8]) -> usize {
    0
}

/// Recognize and score addresses in already-extracted text.
pub async fn scan_text_with(text: &str, recognizer: &Recognizer, scorer: &Scorer) -> ScanReport {
    let started = Instant::now();
    let mut aggregator = Aggregator::new();
    aggregator.add(recognizer.recognize_all(text));
    let (records, duplicates) = aggregator.finish(scorer).await;
    summarize(records, duplicates, Vec::new(), Vec::new(), started)
}
