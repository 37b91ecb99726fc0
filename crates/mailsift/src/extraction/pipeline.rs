//! Escalating text extraction.
//!
//! Strategies are tried in order. Each one runs only while the best content
//! weight so far is below the floor, and its output replaces the current best
//! only when its weight is strictly greater. A strategy that fails outright
//! counts as weight zero and escalation simply continues.

use super::backend::{ProgressSink, TextLayer};
use super::clean::clean_text;
use super::strategy::{ExtractionStrategy, StrategyKind, StrategyOutput, TextLayerStrategy};
use crate::core::config::MailsiftConfig;
use crate::core::io::validate_document_bytes;
use crate::{MailsiftError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome of running the pipeline over one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Cleaned text of the winning strategy.
    pub text: String,
    pub content_weight: usize,
    /// Strategy whose text was kept; `None` when nothing produced text.
    pub strategy: Option<StrategyKind>,
    /// Strategies that ran, in order.
    pub attempted: Vec<StrategyKind>,
    /// Strategies escalation would have tried next but that are not built in.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<StrategyKind>,
}

pub struct ExtractionPipeline {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
    unavailable: Vec<StrategyKind>,
    min_content_weight: usize,
}

impl ExtractionPipeline {
    pub fn new(min_content_weight: usize) -> Self {
        Self {
            strategies: Vec::new(),
            unavailable: Vec::new(),
            min_content_weight,
        }
    }

    pub fn with_strategy(mut self, strategy: impl ExtractionStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn push_strategy(&mut self, strategy: Box<dyn ExtractionStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn strategies(&self) -> Vec<StrategyKind> {
        self.strategies.iter().map(|s| s.kind()).collect()
    }

    /// Record a rung that is configured but missing from this build.
    pub fn mark_unavailable(&mut self, kind: StrategyKind) {
        self.unavailable.push(kind);
    }

    pub fn unavailable(&self) -> &[StrategyKind] {
        &self.unavailable
    }

    pub fn min_content_weight(&self) -> usize {
        self.min_content_weight
    }

    /// Assemble the standard ladder for the enabled backends:
    /// Pdfium text → lopdf text → rendered OCR (if enabled in `config`).
    pub fn from_config(config: &MailsiftConfig) -> Result<Self> {
        let mut pipeline = Self::new(config.extraction.min_content_weight);

        #[cfg(feature = "pdf")]
        {
            use crate::pdf::{PdfiumTextLayer, StreamTextLayer};
            pipeline.push_strategy(Box::new(TextLayerStrategy::primary(Arc::new(PdfiumTextLayer::new()))));
            pipeline.push_strategy(Box::new(TextLayerStrategy::secondary(Arc::new(StreamTextLayer::new()))));
        }

        if config.ocr.enabled {
            crate::ocr::validate_language_code(&config.ocr.language)?;

            #[cfg(all(feature = "pdf", feature = "ocr"))]
            {
                use super::strategy::OcrStrategy;
                use crate::ocr::TesseractEngine;
                use crate::pdf::PdfiumRasterizer;
                pipeline.push_strategy(Box::new(OcrStrategy::new(
                    Arc::new(PdfiumRasterizer::new()),
                    Arc::new(TesseractEngine::new()),
                    config.ocr.language.clone(),
                    config.ocr.render_dpi,
                    config.ocr.max_image_dimension,
                )));
            }

            #[cfg(not(all(feature = "pdf", feature = "ocr")))]
            {
                tracing::warn!(
                    "OCR is enabled in configuration but this build lacks the `ocr` feature; scanned pages will yield no text"
                );
                pipeline.mark_unavailable(StrategyKind::Ocr);
            }
        }

        if pipeline.strategies.is_empty() {
            return Err(MailsiftError::MissingDependency(
                "No PDF backend compiled in. Enable the `pdf` feature".to_string(),
            ));
        }

        Ok(pipeline)
    }

    /// Extract text from one PDF document.
    ///
    /// # Errors
    ///
    /// Only input errors (empty or non-PDF bytes) are returned; backend and page
    /// failures are logged and degrade the result instead.
    pub fn extract(&self, document: &[u8], progress: &dyn ProgressSink) -> Result<ExtractionResult> {
        validate_document_bytes(document)?;

        let mut best = StrategyOutput::default();
        let mut result = ExtractionResult::default();

        for strategy in &self.strategies {
            if best.content_weight >= self.min_content_weight {
                break;
            }

            let kind = strategy.kind();
            result.attempted.push(kind);

            match strategy.extract(document, progress) {
                Ok(output) => {
                    tracing::debug!(
                        strategy = %kind,
                        backend = strategy.backend(),
                        weight = output.content_weight,
                        best_weight = best.content_weight,
                        "Strategy finished"
                    );
                    if output.content_weight > best.content_weight {
                        best = output;
                        result.strategy = Some(kind);
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        strategy = %kind,
                        backend = strategy.backend(),
                        error = %err,
                        "Strategy failed; escalating"
                    );
                }
            }
        }

        if best.content_weight < self.min_content_weight {
            tracing::info!(
                weight = best.content_weight,
                floor = self.min_content_weight,
                "Extraction ended below the content-weight floor"
            );
            if !self.unavailable.is_empty() {
                tracing::warn!(
                    skipped = ?self.unavailable,
                    weight = best.content_weight,
                    "Escalation needed a strategy missing from this build"
                );
                result.skipped = self.unavailable.clone();
            }
        }

        result.text = clean_text(&best.text);
        result.content_weight = best.content_weight;
        Ok(result)
    }
}

impl std::fmt::Debug for ExtractionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionPipeline")
            .field("strategies", &self.strategies())
            .field("unavailable", &self.unavailable)
            .field("min_content_weight", &self.min_content_weight)
            .finish()
    }
}

/// Convenience for tests and callers that wire their own backends.
pub fn text_layer_pipeline(
    primary: Arc<dyn TextLayer>,
    secondary: Arc<dyn TextLayer>,
    min_content_weight: usize,
) -> ExtractionPipeline {
    ExtractionPipeline::new(min_content_weight)
        .with_strategy(TextLayerStrategy::primary(primary))
        .with_strategy(TextLayerStrategy::secondary(secondary))
}
