//! The three escalation strategies.

use super::backend::{PageRasterizer, ProgressSink, TextLayer};
use crate::Result;
use crate::ocr::{DEFAULT_PASSES, OcrEngine, OcrPass, recognize_page};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

pub const UNION_HEADER: &str = "--- Extracted Emails ---";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    PrimaryText,
    SecondaryText,
    Ocr,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrimaryText => "primary_text",
            Self::SecondaryText => "secondary_text",
            Self::Ocr => "ocr",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text produced by one strategy and its content weight (sum of trimmed
/// per-page character counts).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyOutput {
    pub text: String,
    pub content_weight: usize,
}

/// One rung of the escalation ladder.
pub trait ExtractionStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Backend name, for logs.
    fn backend(&self) -> &'static str;

    fn extract(&self, document: &[u8], progress: &dyn ProgressSink) -> Result<StrategyOutput>;
}

/// Strategy over an embedded text layer.
pub struct TextLayerStrategy {
    kind: StrategyKind,
    layer: Arc<dyn TextLayer>,
}

impl TextLayerStrategy {
    pub fn primary(layer: Arc<dyn TextLayer>) -> Self {
        Self {
            kind: StrategyKind::PrimaryText,
            layer,
        }
    }

    pub fn secondary(layer: Arc<dyn TextLayer>) -> Self {
        Self {
            kind: StrategyKind::SecondaryText,
            layer,
        }
    }
}

impl ExtractionStrategy for TextLayerStrategy {
    fn kind(&self) -> StrategyKind {
        self.kind
    }

    fn backend(&self) -> &'static str {
        self.layer.name()
    }

    fn extract(&self, document: &[u8], progress: &dyn ProgressSink) -> Result<StrategyOutput> {
        let mut output = StrategyOutput::default();
        let kind = self.kind;

        self.layer.read_pages(document, &mut |page| {
            match page.text {
                Ok(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        output.content_weight += trimmed.chars().count();
                        output.text.push_str(&format!("\n--- Page {} ---\n", page.number));
                        output.text.push_str(&text);
                        output.text.push('\n');
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        strategy = %kind,
                        page = page.number,
                        total_pages = page.total,
                        error = %err,
                        "Skipping page: text extraction failed"
                    );
                }
            }
            progress.report(page.number, page.total);
        })?;

        Ok(output)
    }
}

/// Strategy rendering each page and running the recognition passes on it.
pub struct OcrStrategy {
    rasterizer: Arc<dyn PageRasterizer>,
    engine: Arc<dyn OcrEngine>,
    language: String,
    dpi: u32,
    max_dimension: u32,
    passes: Vec<OcrPass>,
}

impl OcrStrategy {
    pub fn new(
        rasterizer: Arc<dyn PageRasterizer>,
        engine: Arc<dyn OcrEngine>,
        language: impl Into<String>,
        dpi: u32,
        max_dimension: u32,
    ) -> Self {
        Self {
            rasterizer,
            engine,
            language: language.into(),
            dpi,
            max_dimension,
            passes: DEFAULT_PASSES.to_vec(),
        }
    }

    pub fn with_passes(mut self, passes: Vec<OcrPass>) -> Self {
        self.passes = passes;
        self
    }
}

impl ExtractionStrategy for OcrStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Ocr
    }

    fn backend(&self) -> &'static str {
        self.engine.name()
    }

    fn extract(&self, document: &[u8], progress: &dyn ProgressSink) -> Result<StrategyOutput> {
        let mut output = StrategyOutput::default();
        let mut union: BTreeSet<String> = BTreeSet::new();

        self.rasterizer
            .render_pages(document, self.dpi, self.max_dimension, &mut |page| {
                match page.image {
                    Ok(image) => {
                        let recognition = recognize_page(self.engine.as_ref(), &image, &self.language, &self.passes);
                        tracing::debug!(
                            page = page.number,
                            total_pages = page.total,
                            weight = recognition.weight(),
                            addresses = recognition.addresses.len(),
                            passes_failed = recognition.passes_failed,
                            "Recognized page"
                        );

                        if recognition.weight() > 0 {
                            output.content_weight += recognition.weight();
                            output.text.push_str(&format!("\n--- Page {} (OCR) ---\n", page.number));
                            output.text.push_str(&recognition.best_text);
                            output.text.push('\n');
                        }
                        union.extend(recognition.addresses);
                    }
                    Err(err) => {
                        tracing::warn!(
                            strategy = %StrategyKind::Ocr,
                            page = page.number,
                            total_pages = page.total,
                            error = %err,
                            "Skipping page: rendering failed"
                        );
                    }
                }
                progress.report(page.number, page.total);
            })?;

        if !union.is_empty() {
            output.text.push_str(&format!("\n{}\n", UNION_HEADER));
            output.text.push_str(&union.into_iter().collect::<Vec<_>>().join("\n"));
            output.text.push('\n');
        }

        Ok(output)
    }
}
