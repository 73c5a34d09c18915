use crate::types::ErrorEnvelope;
use std::time::Duration;
use thiserror::Error;

/// Longest slice of a raw error body kept in an error message.
const MAX_BODY_IN_MESSAGE: usize = 300;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Quota exceeded (HTTP {status}): {message}")]
    QuotaExceeded { status: u16, message: String },

    #[error("Authentication failed (HTTP {status}): {message}")]
    Authentication { status: u16, message: String },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Empty response: {0}")]
    EmptyResponse(String),

    #[error("Failed to parse JSON: {0}")]
    JsonParseError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GeminiError {
    /// Whether retrying the same request with the same key may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::Transport(_) | Self::Server { .. }
        )
    }

    /// Whether the failure is tied to the API key that was used.
    #[must_use]
    pub const fn is_credential_failure(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. } | Self::Authentication { .. })
    }
}

impl From<reqwest::Error> for GeminiError {
    fn from(e: reqwest::Error) -> Self {
        // The request URL never carries the key, but strip it anyway to keep messages short.
        Self::Transport(e.without_url().to_string())
    }
}

/// Maps a non-2xx status and its body onto a [`GeminiError`].
///
/// Gemini reports an invalid key as `400 INVALID_ARGUMENT` with an
/// `API_KEY_INVALID` reason, so the body is inspected as well as the status.
#[must_use]
pub fn classify_status(status: u16, body: &str) -> GeminiError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let message = envelope
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| truncate(body));
    let api_status = envelope
        .as_ref()
        .and_then(|e| e.error.status.clone())
        .unwrap_or_default();
    let key_invalid = envelope.as_ref().is_some_and(|e| {
        e.error
            .reasons()
            .iter()
            .any(|r| *r == "API_KEY_INVALID" || *r == "API_KEY_EXPIRED")
    }) || message.contains("API key not valid")
        || message.contains("API key expired");

    match status {
        429 => GeminiError::QuotaExceeded { status, message },
        _ if api_status == "RESOURCE_EXHAUSTED" => GeminiError::QuotaExceeded { status, message },
        401 | 403 => GeminiError::Authentication { status, message },
        400 if key_invalid => GeminiError::Authentication { status, message },
        _ if api_status == "UNAUTHENTICATED" || api_status == "PERMISSION_DENIED" => {
            GeminiError::Authentication { status, message }
        }
        408 | 500..=599 => GeminiError::Server { status, message },
        _ => GeminiError::Rejected { status, message },
    }
}

fn truncate(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_BODY_IN_MESSAGE) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
