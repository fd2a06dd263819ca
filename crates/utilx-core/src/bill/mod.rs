//! Utility bill extraction: provider detection, segmentation and
//! per-provider field extraction.

pub mod detector;
mod parser;
pub mod providers;
pub mod registry;
pub mod rules;
pub mod segmenter;

pub use detector::detect_provider;
pub use parser::{BillParser, ExtractionResult};
pub use providers::{extractor_for, rules_for, segmenter_for, BillExtractor, DocumentContext};
pub use segmenter::Segmenter;
