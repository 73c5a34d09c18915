//! The single-call seam between the rotation controller and a model service.

use async_trait::async_trait;
use gemini_adapter::{GeminiClient, GeminiError};
use serde_json::Value;

use crate::credentials::Credential;
use crate::error::{AttemptFailure, FailureKind};
use crate::response::extract_json;

/// One model call for one document, authenticated with one key.
#[async_trait]
pub trait ExtractionClient: Send + Sync {
    /// Sends `instruction` to `model` using `credential` and returns the parsed JSON reply.
    ///
    /// # Errors
    ///
    /// Returns an `AttemptFailure` classified for the rotation controller.
    async fn extract(
        &self,
        instruction: &str,
        credential: &Credential,
        model: &str,
    ) -> Result<Value, AttemptFailure>;
}

/// [`ExtractionClient`] backed by the Gemini REST API.
#[derive(Clone)]
pub struct GeminiExtractionClient {
    client: GeminiClient,
}

impl GeminiExtractionClient {
    /// Wraps an adapter client.
    #[must_use]
    pub const fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ExtractionClient for GeminiExtractionClient {
    async fn extract(
        &self,
        instruction: &str,
        credential: &Credential,
        model: &str,
    ) -> Result<Value, AttemptFailure> {
        let result = self
            .client
            .generate(credential.expose(), model, instruction)
            .await
            .map_err(|e| AttemptFailure::from(&e))?;

        tracing::debug!(
            duration_ms = result.duration_ms,
            finish_reason = result.finish_reason.as_deref().unwrap_or("unknown"),
            reply_chars = result.text.chars().count(),
            "Model reply received"
        );

        extract_json(&result.text)
            .map_err(|e| AttemptFailure::malformed(format!("reply is not valid JSON: {e}"), result.text))
    }
}

impl From<&GeminiError> for AttemptFailure {
    fn from(e: &GeminiError) -> Self {
        let kind = match e {
            GeminiError::QuotaExceeded { .. } => FailureKind::QuotaExceeded,
            GeminiError::Authentication { .. } => FailureKind::Authentication,
            GeminiError::Timeout(_) | GeminiError::Transport(_) | GeminiError::Server { .. } => {
                FailureKind::TransientNetwork
            }
            GeminiError::EmptyResponse(_) | GeminiError::JsonParseError(_) => {
                FailureKind::MalformedResponse
            }
            GeminiError::Rejected { .. } | GeminiError::InvalidConfig(_) => FailureKind::Rejected,
        };
        Self::new(kind, e.to_string())
    }
}
