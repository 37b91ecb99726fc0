//! Embedded text read through Pdfium.

use super::bindings::{bind_pdfium, open_document};
use super::error::PdfError;
use crate::MailsiftError;
use crate::extraction::{PageText, TextLayer};
use pdfium_render::prelude::*;

/// Primary text layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfiumTextLayer;

impl PdfiumTextLayer {
    pub fn new() -> Self {
        Self
    }
}

impl TextLayer for PdfiumTextLayer {
    fn name(&self) -> &'static str {
        "pdfium"
    }

    fn read_pages(&self, document: &[u8], visit: &mut dyn FnMut(PageText)) -> crate::Result<()> {
        let pdfium = Pdfium::new(bind_pdfium(PdfError::LibraryUnavailable, "text layer")?);
        let pdf = open_document(&pdfium, document)?;

        let total = pdf.pages().len() as usize;
        for (index, page) in pdf.pages().iter().enumerate() {
            let text = page.text().map(|text| text.all()).map_err(|e| {
                MailsiftError::from(PdfError::TextExtractionFailed(format!(
                    "Page {} text extraction failed: {}",
                    index + 1,
                    e
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
