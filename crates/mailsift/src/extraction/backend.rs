//! Seams between the escalation logic and the document libraries.
//!
//! Backends hand pages to a visitor instead of returning an iterator: the
//! Pdfium document borrows its library handle, so pages cannot outlive the
//! call that opened them.

use crate::Result;
use image::DynamicImage;

/// Embedded text of one page.
#[derive(Debug)]
pub struct PageText {
    /// 1-based page number.
    pub number: usize,
    pub total: usize,
    /// A page whose text cannot be read carries its error here; the document
    /// as a whole keeps going.
    pub text: Result<String>,
}

/// One page rendered to a raster image.
#[derive(Debug)]
pub struct RenderedPage {
    /// 1-based page number.
    pub number: usize,
    pub total: usize,
    pub image: Result<DynamicImage>,
}

/// A source of embedded page text.
///
/// `read_pages` returns `Err` only when the document cannot be opened at all;
/// per-page problems are reported through [`PageText::text`].
pub trait TextLayer: Send + Sync {
    fn name(&self) -> &'static str;

    fn read_pages(&self, document: &[u8], visit: &mut dyn FnMut(PageText)) -> Result<()>;
}

/// Renders pages for optical recognition.
pub trait PageRasterizer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Render every page in order at (up to) `dpi`, never exceeding
    /// `max_dimension` pixels on either side.
    fn render_pages(
        &self,
        document: &[u8],
        dpi: u32,
        max_dimension: u32,
        visit: &mut dyn FnMut(RenderedPage),
    ) -> Result<()>;
}

/// Receives `(current_page, total_pages)` after each processed page.
///
/// Called synchronously from the worker thread doing the extraction.
pub trait ProgressSink: Send + Sync {
    fn report(&self, current: usize, total: usize);
}

impl<F> ProgressSink for F
where
    F: Fn(usize, usize) + Send + Sync,
{
    fn report(&self, current: usize, total: usize) {
        self(current, total)
    }
}

/// Sink that discards progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _current: usize, _total: usize) {}
}
