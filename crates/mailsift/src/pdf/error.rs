use std::fmt;

#[derive(Debug, Clone)]
pub enum PdfError {
    InvalidPdf(String),
    PasswordRequired,
    PageNotFound(usize),
    TextExtractionFailed(String),
    RenderingFailed(String),
    MetadataExtractionFailed(String),
    LibraryUnavailable(String),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::InvalidPdf(msg) => write!(f, "Invalid PDF: {}", msg),
            PdfError::PasswordRequired => write!(f, "PDF is password-protected"),
            PdfError::PageNotFound(page) => write!(f, "Page {} not found", page),
            PdfError::TextExtractionFailed(msg) => write!(f, "Text extraction failed: {}", msg),
            PdfError::RenderingFailed(msg) => write!(f, "Page rendering failed: {}", msg),
            PdfError::MetadataExtractionFailed(msg) => write!(f, "Metadata extraction failed: {}", msg),
            PdfError::LibraryUnavailable(msg) => write!(f, "PDF library unavailable: {}", msg),
        }
    }
}

impl std::error::Error for PdfError {}

// No From<std::io::Error>: I/O errors bubble up as MailsiftError::Io.

impl From<lopdf::Error> for PdfError {
    fn from(err: lopdf::Error) -> Self {
        let message = err.to_string();
        if message.to_ascii_lowercase().contains("decrypt") || message.to_ascii_lowercase().contains("password") {
            PdfError::PasswordRequired
        } else {
            PdfError::InvalidPdf(message)
        }
    }
}

pub type Result<T> = std::result::Result<T, PdfError>;

/// Classify a Pdfium load failure.
pub(crate) fn classify_load_error(message: String) -> PdfError {
    if message.contains("password") || message.contains("Password") {
        PdfError::PasswordRequired
    } else {
        PdfError::InvalidPdf(message)
    }
}
