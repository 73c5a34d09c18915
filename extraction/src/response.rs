//! Recovery of a JSON value from free-form model output.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static FENCED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)\s*```").expect("fenced-block pattern is valid")
});

#[allow(clippy::expect_used)]
static BRACED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("brace-span pattern is valid"));

/// Returns the slice of `text` most likely to hold the JSON payload.
///
/// Order: the body of the first fenced code block, else the span from the
/// first `{` to the last `}`, else the whole text.
#[must_use]
pub fn json_candidate(text: &str) -> &str {
    if let Some(body) = FENCED.captures(text).and_then(|c| c.get(1)) {
        return body.as_str().trim();
    }
    if let Some(span) = BRACED.find(text) {
        return span.as_str().trim();
    }
    text.trim()
}

/// Parses the JSON payload out of a model reply.
///
/// A reply that is JSON as a whole is taken as-is, even when a string
/// value inside it contains a code fence. Otherwise [`json_candidate`]
/// picks the slice to parse.
///
/// # Errors
///
/// Returns the `serde_json` error if no candidate slice parses.
pub fn extract_json(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(text.trim()).or_else(|_| serde_json::from_str(json_candidate(text)))
}
