//! Mailsift - Email Address Recognition for PDF Documents
//!
//! Mailsift pulls email addresses out of PDFs, including scanned and
//! obfuscated ones, and scores how likely each is to be a real mailbox.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mailsift::{MailsiftConfig, scan_file_sync};
//!
//! # fn main() -> mailsift::Result<()> {
//! let config = MailsiftConfig::default();
//! let report = scan_file_sync("partners.pdf", &config)?;
//! for record in &report.records {
//!     println!("{} {} ({})", record.address, record.confidence, record.confidence_label());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Extraction** (`extraction`): escalating text retrieval, from the Pdfium text layer
//!   through `lopdf` content streams to multi-pass OCR of rendered pages
//! - **Recognition** (`recognition`): de-obfuscation, address matching, context and hints
//! - **Validation** (`validation`): additive confidence scoring with an optional MX check
//! - **Core** (`core`): configuration, input checks, the per-job orchestrator and entry points
//! - **Jobs** (`jobs`): background jobs with polled status
//!
//! # Features
//!
//! - `pdf` (default): Pdfium and `lopdf` backends
//! - `dns` (default): live mail-exchange lookups
//! - `ocr`: Tesseract engine for the optical layer

#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod extraction;
pub mod jobs;
pub mod ocr;
pub mod recognition;
pub mod types;
pub mod validation;

#[cfg(feature = "pdf")]
pub mod pdf;

pub use error::{MailsiftError, Result};
pub use types::*;

pub use core::config::{ExtractionConfig, MailsiftConfig, OcrConfig, ValidationConfig};
pub use core::extractor::{
    check_addresses, check_addresses_sync, scan_bytes, scan_bytes_sync, scan_file, scan_file_sync, scan_files,
    scan_files_sync, scan_text, scan_text_sync,
};
pub use core::orchestrator::{DocumentSource, NoopObserver, Orchestrator, ScanObserver, ScanProgress};

pub use extraction::{ExtractionPipeline, ExtractionResult, ProgressSink, StrategyKind};
pub use jobs::{JobId, JobRegistry, JobState, JobStats, JobStatus};
pub use recognition::{Normalizer, Recognizer, normalize};
pub use validation::{MxResolver, Scorer};
