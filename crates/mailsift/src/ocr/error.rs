use std::fmt;

/// Errors raised by the optical-recognition layer.
#[derive(Debug, Clone)]
pub enum OcrError {
    TesseractInitializationFailed(String),
    InvalidConfiguration(String),
    InvalidLanguageCode(String),
    ImageProcessingFailed(String),
    ProcessingFailed(String),
}

impl fmt::Display for OcrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TesseractInitializationFailed(msg) => {
                write!(f, "Tesseract initialization failed: {}", msg)
            }
            Self::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
            Self::InvalidLanguageCode(msg) => write!(f, "Invalid language code: {}", msg),
            Self::ImageProcessingFailed(msg) => write!(f, "Image processing failed: {}", msg),
            Self::ProcessingFailed(msg) => write!(f, "OCR processing failed: {}", msg),
        }
    }
}

impl std::error::Error for OcrError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            OcrError::InvalidLanguageCode("e1g".to_string()).to_string(),
            "Invalid language code: e1g"
        );
        assert_eq!(
            OcrError::ProcessingFailed("no text".to_string()).to_string(),
            "OCR processing failed: no text"
        );
    }

    #[test]
    fn test_converts_to_crate_error() {
        let err: crate::MailsiftError = OcrError::TesseractInitializationFailed("missing eng".to_string()).into();
        assert!(matches!(err, crate::MailsiftError::Ocr { .. }));
        assert!(err.to_string().contains("missing eng"));
    }
}
