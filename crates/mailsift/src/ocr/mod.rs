//! Optical-recognition layer.
//!
//! Pages are rendered elsewhere; this module turns a page image into text by
//! running several independently preprocessed recognition passes and pooling
//! the addresses they read.
//!
//! - [`engine::OcrEngine`] is the seam between the pass runner and Tesseract
//! - [`preprocess`] holds the image treatments (adaptive threshold, Otsu,
//!   CLAHE + denoise)
//! - [`passes::recognize_page`] runs the passes and merges them
//!
//! The Tesseract engine requires the `ocr` feature.
pub mod engine;
pub mod error;
pub mod passes;
pub mod preprocess;
#[cfg(feature = "ocr")]
pub mod processor;
pub mod types;

pub use engine::OcrEngine;
pub use error::OcrError;
pub use passes::{PageRecognition, recognize_page};
#[cfg(feature = "ocr")]
pub use processor::TesseractEngine;
pub use types::{DEFAULT_PASSES, OcrPass, PSMMode, Preprocessing, validate_language_code};
