//! Document input checks and file reading.
//!
//! Missing inputs and non-PDF inputs are the only hard failures of a scan;
//! everything here reports them before any backend touches the bytes.

use crate::{MailsiftError, Result};
use std::path::Path;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Validate that a file exists.
///
/// # Errors
///
/// Returns `MailsiftError::Validation` if file doesn't exist.
pub fn validate_file_exists(path: impl AsRef<Path>) -> Result<()> {
    if !path.as_ref().exists() {
        return Err(MailsiftError::validation(format!(
            "File does not exist: {}",
            path.as_ref().display()
        )));
    }
    Ok(())
}

/// Validate that a path names an existing `.pdf` file.
///
/// The type check is made on the extension, case-insensitively.
///
/// # Errors
///
/// - `MailsiftError::Validation` if the file is missing
/// - `MailsiftError::UnsupportedFormat` for any other file type
pub fn validate_document_path(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    validate_file_exists(path)?;

    let guessed = mime_guess::from_path(path).first_raw();
    if guessed != Some(PDF_MIME_TYPE) {
        let suffix = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_else(|| "(no extension)".to_string());
        return Err(MailsiftError::UnsupportedFormat(format!(
            "Invalid file type: {} ({})",
            suffix,
            path.display()
        )));
    }

    Ok(())
}

/// Validate that a byte buffer starts like a PDF document.
pub fn validate_document_bytes(bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        return Err(MailsiftError::validation("Document is empty"));
    }

    match infer::get(bytes) {
        Some(kind) if kind.mime_type() == PDF_MIME_TYPE => Ok(()),
        Some(kind) => Err(MailsiftError::UnsupportedFormat(format!(
            "Invalid file type: {}",
            kind.mime_type()
        ))),
        None => Err(MailsiftError::UnsupportedFormat(
            "Invalid file type: content is not a PDF document".to_string(),
        )),
    }
}

/// Read a document after validating its path.
pub fn read_document_sync(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    validate_document_path(&path)?;
    std::fs::read(path.as_ref()).map_err(MailsiftError::Io)
}

/// Read a document asynchronously after validating its path.
pub async fn read_document(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    validate_document_path(&path)?;
    tokio::fs::read(path.as_ref()).await.map_err(MailsiftError::Io)
}
