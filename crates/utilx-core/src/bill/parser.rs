//! Bill parsing pipeline: detect the provider, split the document into
//! sections and extract one record per recognized section.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use super::detector::detect_provider;
use super::providers::rules_for;
use super::rules::normalize_line_endings;
use crate::error::{ExtractionError, Result};
use crate::models::bill::{BillRecord, Provider};
use crate::models::config::{ExtractionConfig, DEFAULT_MAX_DOCUMENT_BYTES};

/// Result of parsing one document.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Provider the document was parsed as.
    pub provider: Provider,
    /// Records in section order.
    pub records: Vec<BillRecord>,
    /// Number of sections the document was split into.
    pub sections: usize,
    /// Sections that did not yield a record.
    pub skipped_sections: usize,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Rule-based parser for utility bill text.
#[derive(Debug, Clone)]
pub struct BillParser {
    /// Documents larger than this are rejected.
    max_document_bytes: usize,
    /// Warn about records missing required fields.
    completeness_warnings: bool,
    /// Skip detection and parse every document as this provider.
    force_provider: Option<Provider>,
}

impl BillParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self {
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            completeness_warnings: true,
            force_provider: None,
        }
    }

    /// Create a parser from the extraction section of the configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            max_document_bytes: config.max_document_bytes,
            completeness_warnings: config.completeness_warnings,
            force_provider: config.force_provider,
        }
    }

    /// Set the largest accepted document size in bytes.
    pub fn with_max_document_bytes(mut self, bytes: usize) -> Self {
        self.max_document_bytes = bytes;
        self
    }

    /// Set completeness warnings.
    pub fn with_completeness_warnings(mut self, enabled: bool) -> Self {
        self.completeness_warnings = enabled;
        self
    }

    /// Parse every document as `provider` instead of detecting it.
    pub fn with_provider(mut self, provider: Option<Provider>) -> Self {
        self.force_provider = provider;
        self
    }

    /// Detect the provider of `text` and extract its records.
    pub fn parse(&self, text: &str) -> Result<ExtractionResult> {
        self.check_input(text)?;

        let provider = match self.force_provider {
            Some(provider) => provider,
            None => detect_provider(text)?,
        };
        self.extract(provider, text)
    }

    /// Extract records from `text` using `provider`'s rules, skipping
    /// detection.
    pub fn parse_as(&self, provider: Provider, text: &str) -> Result<ExtractionResult> {
        self.check_input(text)?;
        self.extract(provider, text)
    }

    fn check_input(&self, text: &str) -> std::result::Result<(), ExtractionError> {
        if text.trim().is_empty() {
            return Err(ExtractionError::InvalidInput(
                "document text is empty".to_string(),
            ));
        }
        if text.len() > self.max_document_bytes {
            return Err(ExtractionError::InvalidInput(format!(
                "document is {} bytes, limit is {}",
                text.len(),
                self.max_document_bytes
            )));
        }
        Ok(())
    }

    fn extract(&self, provider: Provider, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!(
            "Parsing {} bill from {} characters of text",
            provider.display_name(),
            text.len()
        );

        let text = normalize_line_endings(text);
        let rules = rules_for(provider);
        let context = rules.extractor.document_context(&text);
        let sections = rules.segmenter.segment(&text);

        if sections.is_empty() {
            warnings.push(format!(
                "No bill sections found for {}",
                provider.display_name()
            ));
        }

        let mut records = Vec::with_capacity(sections.len());
        let mut skipped_sections = 0;

        for (index, section) in sections.iter().enumerate() {
            let number = index + 1;
            let Some(record) = rules.extractor.extract(section, &context) else {
                debug!(section = number, "Section not recognized, skipping");
                warnings.push(format!(
                    "Section {} not recognized as a {} bill",
                    number,
                    provider.display_name()
                ));
                skipped_sections += 1;
                continue;
            };

            if self.completeness_warnings {
                let missing = record.missing_fields();
                if !missing.is_empty() {
                    warnings.push(format!(
                        "Section {}: could not extract {}",
                        number,
                        missing.join(", ")
                    ));
                }
            }

            debug!(
                section = number,
                account = record.account_number.as_deref().unwrap_or("-"),
                "Extracted bill record"
            );
            records.push(record);
        }

        debug!(
            "Extracted {} records from {} sections ({} skipped)",
            records.len(),
            sections.len(),
            skipped_sections
        );

        Ok(ExtractionResult {
            provider,
            records,
            sections: sections.len(),
            skipped_sections,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

impl Default for BillParser {
    fn default() -> Self {
        Self::new()
    }
}
