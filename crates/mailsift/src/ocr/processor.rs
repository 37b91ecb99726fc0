use std::env;
use std::path::Path;

use image::DynamicImage;
use kreuzberg_tesseract::{TessPageSegMode, TesseractAPI};

use super::engine::OcrEngine;
use super::error::OcrError;
use super::types::{PSMMode, validate_language_code};

const TESSDATA_FALLBACK_PATHS: &[&str] = &[
    "/opt/homebrew/share/tessdata",
    "/opt/homebrew/opt/tesseract/share/tessdata",
    "/usr/local/opt/tesseract/share/tessdata",
    "/usr/share/tesseract-ocr/5/tessdata",
    "/usr/share/tesseract-ocr/4/tessdata",
    "/usr/share/tessdata",
    "/usr/local/share/tessdata",
    r#"C:\Program Files\Tesseract-OCR\tessdata"#,
];

fn strip_control_characters(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}') || matches!(c, '\n' | '\r' | '\t'))
        .collect()
}

/// Locate the tessdata directory: `TESSDATA_PREFIX` first, then well-known
/// install locations. Empty when nothing is found, letting Tesseract fall back
/// to its compiled-in default.
pub fn resolve_tessdata_path() -> String {
    env::var("TESSDATA_PREFIX")
        .ok()
        .or_else(|| {
            TESSDATA_FALLBACK_PATHS
                .iter()
                .find(|p| Path::new(p).exists())
                .map(|p| (*p).to_string())
        })
        .unwrap_or_default()
}

/// Tesseract-backed [`OcrEngine`].
///
/// A fresh API handle is initialized per call so passes can run on separate
/// threads.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    tessdata_path: String,
}

impl TesseractEngine {
    pub fn new() -> Self {
        Self {
            tessdata_path: resolve_tessdata_path(),
        }
    }

    pub fn with_tessdata_path(path: impl Into<String>) -> Self {
        Self {
            tessdata_path: path.into(),
        }
    }

    fn check_language_files(&self, language: &str) -> Result<(), OcrError> {
        validate_language_code(language)?;

        // Tesseract can crash instead of erroring when a traineddata file is missing.
        if self.tessdata_path.is_empty() {
            return Ok(());
        }
        for lang in language.split('+').map(str::trim).filter(|l| !l.is_empty()) {
            let traineddata_path = Path::new(&self.tessdata_path).join(format!("{}.traineddata", lang));
            if !traineddata_path.exists() {
                return Err(OcrError::TesseractInitializationFailed(format!(
                    "Language '{}' not found. Traineddata file does not exist: {}",
                    lang,
                    traineddata_path.display()
                )));
            }
        }
        Ok(())
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn recognize(&self, image: &DynamicImage, psm: PSMMode, language: &str) -> Result<String, OcrError> {
        self.check_language_files(language)?;

        let rgb_image = image.to_rgb8();
        let (width, height) = rgb_image.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::ImageProcessingFailed("Image has zero width or height".to_string()));
        }
        let bytes_per_pixel = 3u32;
        let bytes_per_line = width * bytes_per_pixel;

        let api = TesseractAPI::new();
        api.init(&self.tessdata_path, language).map_err(|e| {
            OcrError::TesseractInitializationFailed(format!("Failed to initialize language '{}': {}", language, e))
        })?;

        api.set_page_seg_mode(TessPageSegMode::from_int(psm.as_u8() as i32))
            .map_err(|e| OcrError::InvalidConfiguration(format!("Failed to set PSM mode: {}", e)))?;

        api.set_image(
            rgb_image.as_raw(),
            width as i32,
            height as i32,
            bytes_per_pixel as i32,
            bytes_per_line as i32,
        )
        .map_err(|e| OcrError::ProcessingFailed(format!("Failed to set image: {}", e)))?;

        api.recognize()
            .map_err(|e| OcrError::ProcessingFailed(format!("Failed to recognize text: {}", e)))?;

        let text = api
            .get_utf8_text()
            .map_err(|e| OcrError::ProcessingFailed(format!("Failed to extract text: {}", e)))?;

        Ok(strip_control_characters(&text))
    }
}
