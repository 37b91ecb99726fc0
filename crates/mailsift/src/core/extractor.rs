//! Main scan entry points.
//!
//! # Functions
//!
//! - [`scan_file`] / [`scan_files`] - Scan PDF documents on disk
//! - [`scan_bytes`] - Scan an in-memory PDF document
//! - [`scan_text`] - Recognize and score addresses in plain text
//! - [`check_addresses`] - Score addresses directly
//!
//! Each async function has a `_sync` twin driven by a shared runtime.

use crate::Result;
use crate::core::config::MailsiftConfig;
use crate::core::orchestrator::{DocumentSource, NoopObserver, Orchestrator, scan_text_with};
use crate::recognition::Recognizer;
use crate::types::{ScanReport, ValidationOutcome};
use crate::validation::Scorer;
use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::Arc;

/// Global Tokio runtime for synchronous operations.
///
/// Lazily initialized on first use and shared by all sync wrappers. Runtime
/// creation can only fail on resource exhaustion, in which case nothing else
/// would work either.
static GLOBAL_RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create global Tokio runtime - system may be out of resources")
});

/// Scan one PDF file.
///
/// # Errors
///
/// - `MailsiftError::Validation` if the file does not exist
/// - `MailsiftError::UnsupportedFormat` if it is not a PDF
/// - `MailsiftError::MissingDependency` if no PDF backend is compiled in
///
/// # Example
///
/// ```rust,no_run
/// use mailsift::{MailsiftConfig, scan_file};
///
/// # async fn example() -> mailsift::Result<()> {
/// let report = scan_file("contacts.pdf", &MailsiftConfig::default()).await?;
/// for record in &report.records {
///     println!("{} ({})", record.address, record.confidence);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn scan_file(path: impl AsRef<Path>, config: &MailsiftConfig) -> Result<ScanReport> {
    scan_files(&[path], config).await
}

/// Scan several PDF files into one merged report.
///
/// Documents are processed in order. A document that is missing or not a PDF
/// is listed in `files_failed` rather than failing the whole scan.
pub async fn scan_files(paths: &[impl AsRef<Path>], config: &MailsiftConfig) -> Result<ScanReport> {
    let documents: Vec<DocumentSource> = paths.iter().map(|p| DocumentSource::from(p.as_ref())).collect();
    Orchestrator::new(config)?
        .scan(&documents, Arc::new(NoopObserver))
        .await
}

/// Scan an in-memory PDF document.
pub async fn scan_bytes(name: &str, bytes: Vec<u8>, config: &MailsiftConfig) -> Result<ScanReport> {
    Orchestrator::new(config)?
        .scan(&[DocumentSource::bytes(name, bytes)], Arc::new(NoopObserver))
        .await
}

/// Recognize and score addresses in text that needs no extraction.
pub async fn scan_text(text: &str, config: &MailsiftConfig) -> Result<ScanReport> {
    config.validate()?;
    let scorer = Scorer::new(&config.validation);
    Ok(scan_text_with(text, &Recognizer::new(), &scorer).await)
}

/// Score addresses as given, without recognition.
pub async fn check_addresses<S: AsRef<str>>(addresses: &[S], config: &MailsiftConfig) -> Result<Vec<ValidationOutcome>> {
    config.validate()?;
    Ok(Scorer::new(&config.validation).validate_batch(addresses).await)
}

/// Synchronous wrapper for [`scan_file`].
pub fn scan_file_sync(path: impl AsRef<Path>, config: &MailsiftConfig) -> Result<ScanReport> {
    GLOBAL_RUNTIME.block_on(scan_file(path, config))
}

/// Synchronous wrapper for [`scan_files`].
pub fn scan_files_sync(paths: &[impl AsRef<Path>], config: &MailsiftConfig) -> Result<ScanReport> {
    GLOBAL_RUNTIME.block_on(scan_files(paths, config))
}

/// Synchronous wrapper for [`scan_bytes`].
pub fn scan_bytes_sync(name: &str, bytes: Vec<u8>, config: &MailsiftConfig) -> Result<ScanReport> {
    GLOBAL_RUNTIME.block_on(scan_bytes(name, bytes, config))
}

/// Synchronous wrapper for [`scan_text`].
pub fn scan_text_sync(text: &str, config: &MailsiftConfig) -> Result<ScanReport> {
    GLOBAL_RUNTIME.block_on(scan_text(text, config))
}

/// Synchronous wrapper for [`check_addresses`].
pub fn check_addresses_sync<S: AsRef<str>>(addresses: &[S], config: &MailsiftConfig) -> Result<Vec<ValidationOutcome>> {
    GLOBAL_RUNTIME.block_on(check_addresses(addresses, config))
}
