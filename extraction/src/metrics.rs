//! Per-document call counts, timing and rough token usage.

use std::time::Duration;

/// Metrics collected while extracting one document.
#[derive(Debug, Clone, Default)]
pub struct ExtractionMetrics {
    /// Total number of model calls made.
    pub total_attempts: usize,
    /// Number of distinct keys used.
    pub credentials_tried: usize,
    /// Wall-clock time elapsed during extraction.
    pub wall_time: Duration,
    /// Estimated input tokens sent to the model.
    pub estimated_input_tokens: usize,
    /// Estimated output tokens received from the model.
    pub estimated_output_tokens: usize,
}

/// Rough token count for log output: one token per four characters, rounded up.
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}
