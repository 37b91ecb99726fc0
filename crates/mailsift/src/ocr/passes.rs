//! Multi-pass recognition of a single page.
//!
//! Every pass sees its own preprocessed copy of the page and runs
//! independently. The pass with the most text becomes the page's prose; the
//! address-shaped matches of all passes are pooled so an address read by only
//! one pass still survives.

use super::engine::OcrEngine;
use super::preprocess;
use super::types::OcrPass;
use crate::recognition::{find_address_shaped, normalize_address};
use image::DynamicImage;
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Combined outcome of all passes over one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRecognition {
    /// Text of the pass with the longest trimmed output.
    pub best_text: String,
    /// Addresses matched by any pass, normalized and sorted.
    pub addresses: BTreeSet<String>,
    pub passes_succeeded: usize,
    pub passes_failed: usize,
}

impl PageRecognition {
    pub fn weight(&self) -> usize {
        self.best_text.trim().chars().count()
    }
}

/// Run `passes` over one rendered page.
///
/// Pass failures are logged and skipped; a page where every pass fails yields
/// an empty recognition.
pub fn recognize_page(
    engine: &dyn OcrEngine,
    image: &DynamicImage,
    language: &str,
    passes: &[OcrPass],
) -> PageRecognition {
    let outputs: Vec<(OcrPass, Result<String, super::error::OcrError>)> = passes
        .par_iter()
        .map(|pass| {
            let prepared = preprocess::apply(pass.preprocessing, image);
            (*pass, engine.recognize(&prepared, pass.psm, language))
        })
        .collect();

    let mut page = PageRecognition::default();
    let mut best_weight = 0usize;

    for (pass, output) in outputs {
        match output {
            Ok(text) => {
                page.passes_succeeded += 1;
                page.addresses.extend(find_address_shaped(&text).map(normalize_address));

                let weight = text.trim().chars().count();
                if weight > best_weight {
                    best_weight = weight;
                    page.best_text = text;
                }
            }
            Err(err) => {
                page.passes_failed += 1;
                tracing::debug!(
                    engine = engine.name(),
                    preprocessing = ?pass.preprocessing,
                    psm = pass.psm.as_u8(),
                    error = %err,
                    "OCR pass failed"
                );
            }
        }
    }

    page
}
