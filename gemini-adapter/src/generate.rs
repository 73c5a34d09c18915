use crate::error::{classify_status, GeminiError};
use crate::types::{GeminiConfig, GenerateContentRequest, GenerateContentResponse, GenerateResult};
use std::time::Instant;
use tokio::time::timeout;

/// Header carrying the API key, so it never appears in URLs or logs.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Performs one `models/{model}:generateContent` call.
///
/// The whole exchange, body included, is bounded by `config.timeout`.
///
/// # Errors
///
/// Returns a classified `GeminiError`; see [`classify_status`].
///
/// [`classify_status`]: crate::classify_status
pub async fn generate_content(
    http: &reqwest::Client,
    config: &GeminiConfig,
    api_key: &str,
    model: &str,
    prompt: &str,
) -> Result<GenerateResult, GeminiError> {
    let url = format!(
        "{}/models/{model}:generateContent",
        config.base_url.trim_end_matches('/')
    );
    let body = GenerateContentRequest::user_prompt(prompt, config);
    let start_time = Instant::now();

    tracing::debug!(model, prompt_chars = prompt.chars().count(), "POST generateContent");

    let exchange = async {
        let response = http
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        Ok::<_, GeminiError>((status, text))
    };

    let (status, text) = match timeout(config.timeout, exchange).await {
        Ok(res) => res?,
        Err(_) => return Err(GeminiError::Timeout(config.timeout)),
    };

    if !status.is_success() {
        return Err(classify_status(status.as_u16(), &text));
    }

    let parsed: GenerateContentResponse =
        serde_json::from_str(&text).map_err(|e| GeminiError::JsonParseError(e.to_string()))?;
    let Some(reply) = parsed.text() else {
        return Err(GeminiError::EmptyResponse(parsed.empty_reason()));
    };

    Ok(GenerateResult {
        text: reply,
        usage: parsed.usage_metadata,
        finish_reason: parsed
            .candidates
            .first()
            .and_then(|c| c.finish_reason.clone()),
        duration_ms: u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX),
    })
}
