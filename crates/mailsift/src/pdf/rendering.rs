use super::bindings::{bind_pdfium, open_document};
use super::error::PdfError;
use crate::MailsiftError;
use crate::extraction::{PageRasterizer, RenderedPage};
use image::DynamicImage;
use pdfium_render::prelude::*;

const PDF_POINTS_PER_INCH: f64 = 72.0;
const MIN_RENDER_DPI: u32 = 72;

/// Renders pages through Pdfium for the optical layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfiumRasterizer;

impl PdfiumRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn name(&self) -> &'static str {
        "pdfium"
    }

    fn render_pages(
        &self,
        document: &[u8],
        dpi: u32,
        max_dimension: u32,
        visit: &mut dyn FnMut(RenderedPage),
    ) -> crate::Result<()> {
        let pdfium = Pdfium::new(bind_pdfium(PdfError::LibraryUnavailable, "page rendering")?);
        let pdf = open_document(&pdfium, document)?;

        let total = pdf.pages().len() as usize;
        for (index, page) in pdf.pages().iter().enumerate() {
            visit(RenderedPage {
                number: index + 1,
                total,
                image: render_page(&page, dpi, max_dimension).map_err(MailsiftError::from),
            });
        }

        Ok(())
    }
}

fn render_page(page: &PdfPage<'_>, target_dpi: u32, max_dimension: u32) -> Result<DynamicImage, PdfError> {
    let width_points = page.width().value;
    let height_points = page.height().value;

    let dpi = calculate_optimal_dpi(width_points as f64, height_points as f64, target_dpi, max_dimension);
    let scale = dpi as f64 / PDF_POINTS_PER_INCH;

    let config = PdfRenderConfig::new()
        .set_target_width(((width_points as f64 * scale) as i32).max(1))
        .set_target_height(((height_points as f64 * scale) as i32).max(1))
        .rotate_if_landscape(PdfPageRenderRotation::None, false);

    let bitmap = page
        .render_with_config(&config)
        .map_err(|e| PdfError::RenderingFailed(format!("Failed to render page: {}", e)))?;

    Ok(DynamicImage::ImageLuma8(bitmap.as_image().into_luma8()))
}

/// Highest DPI up to `target_dpi` at which neither side exceeds `max_dimension`
/// pixels, never below 72.
pub fn calculate_optimal_dpi(page_width: f64, page_height: f64, target_dpi: u32, max_dimension: u32) -> u32 {
    let target_dpi = target_dpi.max(MIN_RENDER_DPI);
    let width_inches = page_width / PDF_POINTS_PER_INCH;
    let height_inches = page_height / PDF_POINTS_PER_INCH;

    let widest = width_inches.max(height_inches);
    if widest <= 0.0 || widest * target_dpi as f64 <= max_dimension as f64 {
        return target_dpi;
    }

    ((max_dimension as f64 / widest) as u32).clamp(MIN_RENDER_DPI, target_dpi)
}
