//! PDF backends.
//!
//! - [`PdfiumTextLayer`]: embedded text through Pdfium (primary text layer)
//! - [`StreamTextLayer`]: content-stream text through `lopdf` (secondary text layer)
//! - [`PdfiumRasterizer`]: page rendering for the optical layer
//! - [`probe`]: page count, encryption and image presence
//!
//! Pdfium is loaded from `PDFIUM_LIB_DIR` or the system library path the first
//! time a backend needs it. When it cannot be found the Pdfium backends fail
//! and the pipeline falls through to `lopdf`.

pub mod bindings;
pub mod error;
pub mod metadata;
pub mod rendering;
pub mod stream_text;
pub mod text;

#[cfg(test)]
pub(crate) mod fixtures;

pub use bindings::PDFIUM_LIB_DIR_ENV;
pub use error::PdfError;
pub use metadata::probe;
pub use rendering::{PdfiumRasterizer, calculate_optimal_dpi};
pub use stream_text::StreamTextLayer;
pub use text::PdfiumTextLayer;
