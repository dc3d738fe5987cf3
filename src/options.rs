use std::time::Duration;

/// Configures HTTP timeout and retry behavior.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientOptions {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Delay before the first retry in milliseconds.
    pub retry_delay_ms: u64,
    /// Multiplier applied to the delay after every retry.
    pub retry_backoff: f64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            max_retries: 3,
            retry_delay_ms: 1_000,
            retry_backoff: 2.0,
        }
    }
}

impl ClientOptions {
    /// Per-request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Delay to wait after the failed attempt with 0-based index `attempt`.
    ///
    /// Equals `retry_delay_ms × retry_backoff^attempt`. Growth is not capped;
    /// values past the range of [`Duration`] saturate to [`Duration::MAX`].
    pub fn retry_delay(&self, attempt: usize) -> Duration {
        let exp = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.retry_delay_ms as f64 / 1_000.0 * self.retry_backoff.powi(exp);
        if secs.is_nan() || secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}
