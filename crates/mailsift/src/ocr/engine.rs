use super::error::OcrError;
use super::types::PSMMode;
use image::DynamicImage;

/// Turns a page image into text.
///
/// Implementations are shared across pages and must tolerate concurrent calls;
/// the recognition passes of one page may run in parallel.
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &'static str;

    fn recognize(&self, image: &DynamicImage, psm: PSMMode, language: &str) -> Result<String, OcrError>;
}
