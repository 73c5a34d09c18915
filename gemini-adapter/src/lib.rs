//! Rust adapter for the Google Gemini `generateContent` REST endpoint.
//!
//! This crate issues single-turn text requests, bounds each one with a
//! timeout, and classifies failures into quota, authentication, transient
//! and rejected outcomes so callers can decide whether to switch keys.

/// Error types returned by adapter operations.
pub mod error;
/// The `generateContent` request/response exchange.
pub mod generate;
/// Shared data types for configuration, wire bodies and results.
pub mod types;

pub use error::{classify_status, GeminiError};
pub use generate::{generate_content, API_KEY_HEADER};
pub use types::*;

/// High-level client for the Gemini API.
///
/// The key is passed per call: one client serves every key in a rotation.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Creates a client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `GeminiError::InvalidConfig` if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gemini-adapter/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GeminiError::InvalidConfig(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Sends `prompt` to `model` authenticated with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns `GeminiError` if the request fails, times out, is refused by
    /// the service, or yields no candidate text.
    pub async fn generate(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
    ) -> Result<GenerateResult, GeminiError> {
        generate_content(&self.http, &self.config, api_key, model, prompt).await
    }
}
