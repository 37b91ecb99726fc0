//! Error types for mailsift.
//!
//! All fallible library operations return [`MailsiftError`] through the
//! crate-wide [`Result`] alias. The enum is built with `thiserror` and keeps the
//! error chain intact through `#[source]` fields.
//!
//! # Error Handling Philosophy
//!
//! **System errors MUST always bubble up unchanged:**
//! - `MailsiftError::Io` (from `std::io::Error`) - file system and permission errors
//!
//! **Input errors abort the scan of that input:**
//! - `Validation` - missing file, invalid configuration or parameters
//! - `UnsupportedFormat` - the input is not a PDF document
//!
//! **Degraded extraction never surfaces here.** A page or backend that fails
//! inside the extraction pipeline is logged and skipped; the pipeline falls
//! through to the next page or strategy instead of returning an error.
//!
//! # Example
//!
//! ```rust
//! use mailsift::{MailsiftError, Result};
//!
//! fn read_document(path: &str) -> Result<Vec<u8>> {
//!     let bytes = std::fs::read(path)?;
//!     if bytes.is_empty() {
//!         return Err(MailsiftError::validation(format!("Document is empty: {}", path)));
//!     }
//!     Ok(bytes)
//! }
//! ```
use thiserror::Error;

/// Result type alias using `MailsiftError`.
pub type Result<T> = std::result::Result<T, MailsiftError>;

/// Main error type for all mailsift operations.
///
/// # Variants
///
/// - `Io` - File system and I/O errors (always bubble up)
/// - `Parsing` - Document parsing errors (corrupt or encrypted PDFs)
/// - `Ocr` - Optical recognition errors
/// - `Validation` - Input validation errors (missing paths, bad config)
/// - `MissingDependency` - A backend was requested that this build does not carry
/// - `UnsupportedFormat` - Input is not a PDF document
/// - `JobNotFound` / `JobNotTerminal` - Job registry lookups and removals
/// - `Other` - Catch-all for uncommon errors
#[derive(Debug, Error)]
pub enum MailsiftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {message}")]
    Parsing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("OCR error: {message}")]
    Ocr {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Job {job_id} is still {state} and cannot be removed")]
    JobNotTerminal { job_id: String, state: String },

    #[error("{0}")]
    Other(String),
}

impl From<crate::ocr::error::OcrError> for MailsiftError {
    fn from(err: crate::ocr::error::OcrError) -> Self {
        MailsiftError::Ocr {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(feature = "pdf")]
impl From<crate::pdf::error::PdfError> for MailsiftError {
    fn from(err: crate::pdf::error::PdfError) -> Self {
        MailsiftError::Parsing {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<tokio::task::JoinError> for MailsiftError {
    fn from(err: tokio::task::JoinError) -> Self {
        MailsiftError::Other(format!("Background task failed: {}", err))
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl MailsiftError {
    error_constructor!(parsing, Parsing);
    error_constructor!(validation, Validation);

    /// Fatal input errors end a single-document job; everything else is either
    /// a system error or an internal failure.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::UnsupportedFormat(_))
    }
}
