//! Shared data types for Gemini adapter configuration, requests and replies.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default REST endpoint for the Gemini API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when the caller does not name one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Configuration shared by every request issued through a [`crate::GeminiClient`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL of the API, without a trailing `/models` segment.
    pub base_url: String,
    /// Maximum wall-clock duration of a single request.
    ///
    /// Default: 120 seconds
    pub timeout: Duration,
    /// Sampling temperature. `None` leaves the service default.
    pub temperature: Option<f32>,
    /// Ask the service for an `application/json` reply.
    pub json_mode: bool,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
            temperature: None,
            json_mode: true,
        }
    }
}

impl GeminiConfig {
    /// Override the base URL (proxies, test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Enable or disable the JSON reply mime type.
    #[must_use]
    pub const fn with_json_mode(mut self, json_mode: bool) -> Self {
        self.json_mode = json_mode;
        self
    }
}

/// Body of a `models/{model}:generateContent` call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns. A single user turn for one-shot extraction.
    pub contents: Vec<Content>,
    /// Optional sampling and output settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Builds a single-turn user request.
    #[must_use]
    pub fn user_prompt(prompt: &str, config: &GeminiConfig) -> Self {
        let generation_config = if config.temperature.is_some() || config.json_mode {
            Some(GenerationConfig {
                temperature: config.temperature,
                response_mime_type: config.json_mode.then(|| "application/json".to_string()),
            })
        } else {
            None
        };

        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config,
        }
    }
}

/// One conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// `user` or `model`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content parts. Only text parts are used by this adapter.
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single content part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Text payload, absent for non-text parts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Sampling and output settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Requested reply mime type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

/// Successful reply from `generateContent`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates; normally exactly one.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Present when the prompt itself was blocked.
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
    /// Token accounting.
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, or `None` if it carries no text.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Human-readable reason why no text came back.
    #[must_use]
    pub fn empty_reason(&self) -> String {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return format!("prompt blocked: {reason}");
        }
        match self.candidates.first() {
            Some(candidate) => format!(
                "candidate has no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ),
            None => "no candidates returned".to_string(),
        }
    }
}

/// A generated candidate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content.
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped (`STOP`, `MAX_TOKENS`, `SAFETY`, ...).
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Feedback about the prompt.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was blocked.
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Token counts reported by the service.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt.
    #[serde(default)]
    pub prompt_token_count: Option<u32>,
    /// Tokens in the candidates.
    #[serde(default)]
    pub candidates_token_count: Option<u32>,
    /// Total tokens billed.
    #[serde(default)]
    pub total_token_count: Option<u32>,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    /// The error payload.
    pub error: ErrorBody,
}

/// Google API error payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    /// HTTP status code echoed by the service.
    #[serde(default)]
    pub code: Option<u16>,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Canonical status, e.g. `RESOURCE_EXHAUSTED`.
    #[serde(default)]
    pub status: Option<String>,
    /// Structured details (`ErrorInfo.reason` carries `API_KEY_INVALID`).
    #[serde(default)]
    pub details: Vec<serde_json::Value>,
}

impl ErrorBody {
    /// Returns the `reason` fields found in the error details.
    #[must_use]
    pub fn reasons(&self) -> Vec<&str> {
        self.details
            .iter()
            .filter_map(|d| d.get("reason").and_then(serde_json::Value::as_str))
            .collect()
    }
}

/// Result of a completed `generateContent` call.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    /// Concatenated candidate text.
    pub text: String,
    /// Token accounting, if reported.
    pub usage: Option<UsageMetadata>,
    /// Finish reason of the first candidate.
    pub finish_reason: Option<String>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}
