//! Text extraction from PDF documents.
//!
//! The [`ExtractionPipeline`] escalates through text layers and, if they come
//! up short, optical recognition of rendered pages.

pub mod backend;
pub mod clean;
pub mod pipeline;
pub mod strategy;

pub use backend::{NoProgress, PageRasterizer, PageText, ProgressSink, RenderedPage, TextLayer};
pub use clean::clean_text;
pub use pipeline::{ExtractionPipeline, ExtractionResult, text_layer_pipeline};
pub use strategy::{ExtractionStrategy, OcrStrategy, StrategyKind, StrategyOutput, TextLayerStrategy, UNION_HEADER};
