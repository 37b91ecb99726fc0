//! Core orchestration module.
//!
//! - **Entry points**: [`scan_file`], [`scan_bytes`], [`scan_text`], [`check_addresses`]
//! - **Orchestrator**: extraction → recognition → aggregation → scoring per job
//! - **Configuration**: loading and validating [`MailsiftConfig`]
//! - **I/O**: document reading and input validation
//!
//! # Example
//!
//! ```rust,no_run
//! use mailsift::core::extractor::scan_file;
//! use mailsift::core::config::MailsiftConfig;
//!
//! # async fn example() -> mailsift::Result<()> {
//! let config = MailsiftConfig::default();
//! let report = scan_file("directory.pdf", &config).await?;
//! println!("{} addresses, {} valid", report.total_emails, report.valid_emails);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod extractor;
pub mod io;
pub mod orchestrator;

pub use config::{ExtractionConfig, MailsiftConfig, OcrConfig, ValidationConfig};
pub use extractor::{
    check_addresses, check_addresses_sync, scan_bytes, scan_bytes_sync, scan_file, scan_file_sync, scan_files,
    scan_files_sync, scan_text, scan_text_sync,
};
pub use orchestrator::{Aggregator, DocumentSource, NoopObserver, Orchestrator, ScanObserver, ScanProgress};
