//! Document extraction core for pdfjson.
//!
//! This crate turns document text into an instruction for a generative
//! model, recovers JSON from the model's reply, and rotates across API keys
//! when a key is rate-limited or rejected:
//!
//! - [`Credentials`] - Ordered, de-duplicated, non-empty key list
//! - [`build_instruction`] - Prompt assembly with or without a [`Template`]
//! - [`ExtractionClient`] - One model call for one document
//! - [`RotationController`] - Key rotation state machine driving the client
//! - [`ExtractionError`] - Typed per-document failure with attempt history

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod metrics;
pub mod prompt;
pub mod response;
pub mod rotation;
pub mod template;

pub use client::{ExtractionClient, GeminiExtractionClient};
pub use config::RotationConfig;
pub use credentials::{Credential, CredentialError, Credentials};
pub use error::{AttemptFailure, AttemptRecord, ExtractionError, FailureKind};
pub use metrics::{estimate_tokens, ExtractionMetrics};
pub use prompt::build_instruction;
pub use response::extract_json;
pub use rotation::{Outcome, RotationController, RotationState};
pub use template::{Template, TemplateError};

/// Common traits and types for ergonomic usage of the extraction core.
pub mod prelude {
    pub use crate::client::{ExtractionClient, GeminiExtractionClient};
    pub use crate::config::RotationConfig;
    pub use crate::credentials::{Credential, Credentials};
    pub use crate::error::{ExtractionError, FailureKind};
    pub use crate::rotation::RotationController;
    pub use crate::template::Template;
}
