//! Text decoded straight from page content streams with `lopdf`.
//!
//! Needs no native library, so it still works where Pdfium cannot be loaded;
//! text shown through unusual font encodings may come out garbled.

use super::error::PdfError;
use crate::MailsiftError;
use crate::extraction::{PageText, TextLayer};
use lopdf::Document;

/// Secondary text layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct StreamTextLayer;

impl StreamTextLayer {
    pub fn new() -> Self {
        Self
    }
}

impl TextLayer for StreamTextLayer {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn read_pages(&self, document: &[u8], visit: &mut dyn FnMut(PageText)) -> crate::Result<()> {
        let pdf = Document::load_mem(document).map_err(PdfError::from)?;
        if pdf.is_encrypted() {
            return Err(PdfError::PasswordRequired.into());
        }

        let pages = pdf.get_pages();
        let total = pages.len();
        for (index, page_number) in pages.keys().enumerate() {
            let text = pdf.extract_text(&[*page_number]).map_err(|e| {
                MailsiftError::from(PdfError::TextExtractionFailed(format!(
                    "Page {} content stream could not be decoded: {}",
                    page_number, e
                )))
            });

            visit(PageText {
                number: index + 1,
                total,
                text,
            });
        }

        Ok(())
    }
}
