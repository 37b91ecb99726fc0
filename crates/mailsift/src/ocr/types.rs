use super::error::OcrError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static LANGUAGE_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z]{3}(?:_[a-z]+)*$").expect("Language code regex pattern is valid and should compile")
});

/// Page Segmentation Mode for Tesseract OCR.
///
/// Only the layouts the recognition passes use are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PSMMode {
    /// Fully automatic page segmentation.
    Auto = 3,
    /// A single column of text of variable sizes.
    SingleColumn = 4,
    /// A single uniform block of text.
    SingleBlock = 6,
}

impl PSMMode {
    pub fn from_u8(value: u8) -> Result<Self, OcrError> {
        match value {
            3 => Ok(PSMMode::Auto),
            4 => Ok(PSMMode::SingleColumn),
            6 => Ok(PSMMode::SingleBlock),
            _ => Err(OcrError::InvalidConfiguration(format!("Unsupported PSM mode value: {}", value))),
        }
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

/// The image treatment applied before one recognition pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preprocessing {
    /// Gaussian-weighted local threshold.
    AdaptiveThreshold,
    /// Otsu global binarization.
    Otsu,
    /// Contrast-limited histogram equalisation followed by denoising.
    ContrastDenoise,
    /// Rendered page as-is.
    Original,
}

/// One independent recognition pass over a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrPass {
    pub preprocessing: Preprocessing,
    pub psm: PSMMode,
}

/// The four passes run against every rendered page, in order.
pub const DEFAULT_PASSES: [OcrPass; 4] = [
    OcrPass {
        preprocessing: Preprocessing::AdaptiveThreshold,
        psm: PSMMode::SingleBlock,
    },
    OcrPass {
        preprocessing: Preprocessing::Otsu,
        psm: PSMMode::SingleBlock,
    },
    OcrPass {
        preprocessing: Preprocessing::ContrastDenoise,
        psm: PSMMode::SingleColumn,
    },
    OcrPass {
        preprocessing: Preprocessing::Original,
        psm: PSMMode::Auto,
    },
];

/// Check a Tesseract language specification such as `eng` or `eng+chi_sim`.
pub fn validate_language_code(language: &str) -> Result<(), OcrError> {
    let language = language.trim();
    if language.is_empty() {
        return Err(OcrError::InvalidLanguageCode(
            "Language cannot be empty. Please specify a valid language code (e.g., 'eng')".to_string(),
        ));
    }

    for code in language.split('+') {
        if !LANGUAGE_CODE.is_match(code.trim()) {
            return Err(OcrError::InvalidLanguageCode(code.to_string()));
        }
    }
    Ok(())
}
