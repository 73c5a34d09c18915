//! API-key rotation for one document.
//!
//! Rotation is an explicit state machine. [`RotationState::next`] is the
//! pure transition function; [`RotationController`] drives it against an
//! [`ExtractionClient`] and owns the same-key retry budget for transient
//! failures.

use serde_json::Value;
use tokio::time::Instant;

use crate::client::ExtractionClient;
use crate::config::RotationConfig;
use crate::credentials::Credentials;
use crate::error::{AttemptRecord, ExtractionError, FailureKind};
use crate::metrics::{estimate_tokens, ExtractionMetrics};

/// Position in the rotation of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationState {
    /// Calling the model with the key at this index.
    Trying(usize),
    /// A call returned JSON.
    Succeeded,
    /// Every key failed in a way that rotation could route around.
    Exhausted,
    /// A failure unrelated to the key ended the sequence.
    Halted,
}

/// Result of one call, as seen by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The call returned JSON.
    Success,
    /// The call failed.
    Failed(FailureKind),
}

impl RotationState {
    /// Initial state: the first key.
    #[must_use]
    pub const fn start() -> Self {
        Self::Trying(0)
    }

    /// Whether no further calls will be made.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Trying(_))
    }

    /// Transition on `outcome` with `credential_count` keys available.
    ///
    /// The index only ever advances, so a key is never reused within one
    /// document. Terminal states absorb every outcome.
    #[must_use]
    pub const fn next(self, outcome: Outcome, credential_count: usize) -> Self {
        match (self, outcome) {
            (Self::Trying(_), Outcome::Success) => Self::Succeeded,
            (Self::Trying(index), Outcome::Failed(kind)) if kind.rotates() => {
                if index + 1 < credential_count {
                    Self::Trying(index + 1)
                } else {
                    Self::Exhausted
                }
            }
            (Self::Trying(_), Outcome::Failed(_)) => Self::Halted,
            (terminal, _) => terminal,
        }
    }
}

/// Drives one document's extraction across the key list.
#[derive(Debug, Clone, Default)]
pub struct RotationController {
    config: RotationConfig,
}

impl RotationController {
    /// Creates a controller with the given configuration.
    #[must_use]
    pub const fn new(config: RotationConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &RotationConfig {
        &self.config
    }

    /// Runs the rotation for one instruction.
    ///
    /// Keys are tried lazily in order: the first success returns at once.
    /// Quota and authentication failures move to the next key. A transient
    /// failure is retried on the same key up to `transient_retries` times,
    /// then handled like a quota failure. Malformed replies and rejected
    /// requests stop rotation immediately.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::Exhausted` when every key has failed, or
    /// `ExtractionError::Halted` on a failure rotation cannot fix.
    pub async fn run(
        &self,
        client: &dyn ExtractionClient,
        credentials: &Credentials,
        instruction: &str,
        model: &str,
    ) -> Result<(Value, ExtractionMetrics), ExtractionError> {
        let start = Instant::now();
        let mut history: Vec<AttemptRecord> = Vec::new();
        let mut state = RotationState::start();
        let mut retries_left = self.config.transient_retries;
        let mut attempt = 0;
        let input_tokens = estimate_tokens(instruction);

        let metrics = |attempts: usize, tried: usize, output_tokens: usize| ExtractionMetrics {
            total_attempts: attempts,
            credentials_tried: tried,
            wall_time: start.elapsed(),
            estimated_input_tokens: input_tokens * attempts,
            estimated_output_tokens: output_tokens,
        };

        while let RotationState::Trying(index) = state {
            let Some(credential) = credentials.get(index) else {
                break;
            };
            attempt += 1;

            tracing::info!(
                attempt,
                key = %credential,
                position = index + 1,
                of = credentials.len(),
                "Calling model"
            );

            let failure = match client.extract(instruction, credential, model).await {
                Ok(value) => {
                    let output_tokens = estimate_tokens(&value.to_string());
                    return Ok((value, metrics(attempt, index + 1, output_tokens)));
                }
                Err(failure) => failure,
            };

            tracing::warn!(attempt, key = %credential, error = %failure, "Model call failed");
            let kind = failure.kind;
            history.push(AttemptRecord {
                attempt_number: attempt,
                credential_index: index,
                credential: credential.redacted(),
                failure: failure.clone(),
                elapsed: start.elapsed(),
            });

            if kind == FailureKind::TransientNetwork && retries_left > 0 {
                retries_left -= 1;
                tracing::info!(
                    key = %credential,
                    retries_left,
                    delay_ms = u64::try_from(self.config.retry_delay.as_millis()).unwrap_or(u64::MAX),
                    "Retrying same key after transient failure"
                );
                tokio::time::sleep(self.config.retry_delay).await;
                continue;
            }

            state = state.next(Outcome::Failed(kind), credentials.len());
            match state {
                RotationState::Trying(next) => {
                    retries_left = self.config.transient_retries;
                    tracing::warn!("Rotating API key from #{} to #{}", index + 1, next + 1);
                }
                RotationState::Halted => {
                    return Err(ExtractionError::Halted {
                        failure,
                        credential_index: index,
                        history,
                        metrics: metrics(attempt, index + 1, 0),
                    });
                }
                RotationState::Exhausted | RotationState::Succeeded => break,
            }
        }

        tracing::error!(
            attempts = attempt,
            keys = credentials.len(),
            "All API keys exhausted"
        );
        Err(ExtractionError::Exhausted {
            attempts: attempt,
            credentials: credentials.len(),
            history,
            metrics: metrics(attempt, credentials.len(), 0),
        })
    }
}
