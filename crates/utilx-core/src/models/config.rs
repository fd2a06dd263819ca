//! Configuration structures for the extraction pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UtilxError};
use crate::models::bill::Provider;

/// Largest document accepted by default (4 MiB of text).
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 4 * 1024 * 1024;

/// Main configuration for utilx.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilxConfig {
    /// Bill extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Bill extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Documents longer than this are rejected as invalid input.
    pub max_document_bytes: usize,

    /// Add a warning for every record missing a required field.
    pub completeness_warnings: bool,

    /// Provider to assume instead of running detection.
    pub force_provider: Option<Provider>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            completeness_warnings: true,
            force_provider: None,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty_json: bool,

    /// Include extraction warnings in JSON output.
    pub include_warnings: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty_json: true,
            include_warnings: true,
        }
    }
}

impl UtilxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| UtilxError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
