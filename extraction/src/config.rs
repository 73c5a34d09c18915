//! Configuration for key rotation behavior.

use std::time::Duration;

/// Configuration for key rotation behavior.
#[derive(Debug, Clone)]
pub struct RotationConfig {
    /// Extra attempts on the same key after a transient network failure
    /// before the failure counts against the key (default: 0).
    pub transient_retries: usize,
    /// Pause before each transient retry (default: 500 ms).
    pub retry_delay: Duration,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            transient_retries: 0,
            retry_delay: Duration::from_millis(500),
        }
    }
}

impl RotationConfig {
    /// Set the number of same-key retries after a transient failure.
    #[must_use]
    pub const fn with_transient_retries(mut self, retries: usize) -> Self {
        self.transient_retries = retries;
        self
    }

    /// Set the pause before each transient retry.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}
