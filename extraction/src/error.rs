//! Error types for extraction operations with attempt history tracking.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use super::metrics::ExtractionMetrics;

/// Classified reason a single model call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The key hit a rate limit or quota.
    QuotaExceeded,
    /// The key was rejected as invalid, expired, or unauthorised.
    Authentication,
    /// Network error, timeout, or server-side (5xx) failure.
    TransientNetwork,
    /// The reply could not be parsed as JSON, or carried no text.
    MalformedResponse,
    /// The service refused the request for a reason unrelated to the key.
    Rejected,
}

impl FailureKind {
    /// Whether switching to the next key can help.
    ///
    /// Transient failures count here once their same-key retries are spent.
    #[must_use]
    pub const fn rotates(self) -> bool {
        matches!(
            self,
            Self::QuotaExceeded | Self::Authentication | Self::TransientNetwork
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::QuotaExceeded => "quota exceeded",
            Self::Authentication => "authentication error",
            Self::TransientNetwork => "transient network error",
            Self::MalformedResponse => "malformed response",
            Self::Rejected => "request rejected",
        })
    }
}

/// Failure of one model call.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct AttemptFailure {
    /// Classification driving the rotation decision.
    pub kind: FailureKind,
    /// Detail from the service or parser.
    pub message: String,
    /// Raw model text, kept for malformed replies.
    pub raw_output: Option<String>,
}

impl AttemptFailure {
    /// Creates a failure without raw output.
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            raw_output: None,
        }
    }

    /// Creates a malformed-response failure carrying the offending text.
    #[must_use]
    pub fn malformed(message: impl Into<String>, raw_output: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::MalformedResponse,
            message: message.into(),
            raw_output: Some(raw_output.into()),
        }
    }
}

/// Record of a single failed attempt.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    /// The attempt number (1-indexed, across all keys).
    pub attempt_number: usize,
    /// Rotation position of the key used (0-indexed).
    pub credential_index: usize,
    /// Redacted form of the key used.
    pub credential: String,
    /// What went wrong.
    pub failure: AttemptFailure,
    /// Elapsed time at this attempt.
    pub elapsed: Duration,
}

/// Errors that end extraction of one document.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Every key failed with a quota, authentication, or transient error.
    #[error("All {credentials} API keys exhausted after {attempts} attempts")]
    Exhausted {
        /// Number of calls made.
        attempts: usize,
        /// Number of keys available.
        credentials: usize,
        /// History of all attempts.
        history: Vec<AttemptRecord>,
        /// Metrics tracked across all attempts.
        metrics: ExtractionMetrics,
    },

    /// A failure unrelated to the key stopped rotation.
    #[error("Extraction halted: {failure}")]
    Halted {
        /// The failure that stopped rotation.
        failure: AttemptFailure,
        /// Rotation position of the key in use (0-indexed).
        credential_index: usize,
        /// History of all attempts, including the halting one.
        history: Vec<AttemptRecord>,
        /// Metrics tracked across all attempts.
        metrics: ExtractionMetrics,
    },
}

impl ExtractionError {
    /// Attempt history leading to this error.
    #[must_use]
    pub fn history(&self) -> &[AttemptRecord] {
        match self {
            Self::Exhausted { history, .. } | Self::Halted { history, .. } => history,
        }
    }

    /// Metrics gathered before the error.
    #[must_use]
    pub const fn metrics(&self) -> &ExtractionMetrics {
        match self {
            Self::Exhausted { metrics, .. } | Self::Halted { metrics, .. } => metrics,
        }
    }

    /// Raw model output when the halting failure was a malformed reply.
    #[must_use]
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            Self::Halted { failure, .. } => failure.raw_output.as_deref(),
            Self::Exhausted { .. } => None,
        }
    }
}
