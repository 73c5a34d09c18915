use pdfjson_extraction::{CredentialError, TemplateError};
use thiserror::Error;

/// Errors that stop a run before any document is processed.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No usable API key.
    #[error("Configuration error: {0}. Pass keys with --api or list them in api_key.txt")]
    Credentials(#[from] CredentialError),

    /// The template could not be loaded.
    #[error("Configuration error: {0}")]
    Template(#[from] TemplateError),

    /// The Gemini client could not be built.
    #[error("Gemini client error: {0}")]
    Client(#[from] gemini_adapter::GeminiError),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anyhow error.
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}
