//! Core library for utility bill text extraction.
//!
//! This crate provides:
//! - Provider detection from the text of a bill
//! - Segmentation of consolidated and multi-commodity bills into sections
//! - Per-provider field extraction into normalized [`BillRecord`]s
//! - Bounded-time pattern matching and number/date normalization helpers

pub mod bill;
pub mod error;
pub mod models;

pub use bill::{
    detect_provider, extractor_for, segmenter_for, BillExtractor, BillParser, ExtractionResult,
    Segmenter,
};
pub use error::{ExtractionError, Result, UtilxError};
pub use models::bill::{BillRecord, Provider, UsageType, UsageUnit};
pub use models::config::{ExtractionConfig, OutputConfig, UtilxConfig};

/// Parse `text` with default settings and return its records.
pub fn extract_bills(text: &str) -> Result<Vec<BillRecord>> {
    BillParser::new().parse(text).map(|result| result.records)
}
