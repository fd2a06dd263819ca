//! Provider identification from raw document text.

use tracing::debug;

use super::registry::PROVIDER_KEYWORDS;
use crate::error::ExtractionError;
use crate::models::bill::Provider;

/// Identify which provider issued `text`.
///
/// Providers are tried in registry order and the first one whose keywords
/// all occur (case-insensitively) wins. Ties are not resolved beyond that,
/// so keyword sets must be kept disjoint.
pub fn detect_provider(text: &str) -> Result<Provider, ExtractionError> {
    if text.trim().is_empty() {
        return Err(ExtractionError::InvalidInput(
            "document text is empty".to_string(),
        ));
    }

    let normalized = text.to_lowercase();

    for (provider, keywords) in PROVIDER_KEYWORDS {
        if keywords
            .iter()
            .all(|kw| normalized.contains(&kw.to_lowercase()))
        {
            debug!(provider = provider.id(), "Detected bill provider");
            return Ok(*provider);
        }
    }

    Err(ExtractionError::ProviderNotDetected)
}
