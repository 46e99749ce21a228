use serde::Deserialize;
use std::time::Duration;

/// Delay schedule for the scrape retry loop. All durations in milliseconds
/// when read from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Wait before the first attempt.
    pub initial_delay_ms: u64,
    /// Attempt `n > 1` waits `n * backoff_step_ms`; so does the pause after a
    /// transport error on attempt `n`.
    pub backoff_step_ms: u64,
    /// Extra wait after a 429 on attempt `n`: `n * rate_limit_step_ms`.
    pub rate_limit_step_ms: u64,
    /// Pause before following each redirect.
    pub redirect_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 200,
            backoff_step_ms: 1000,
            rate_limit_step_ms: 2000,
            redirect_delay_ms: 100,
        }
    }
}

impl RetryPolicy {
    /// Everything at zero; used where wall-clock waits would only slow tests down.
    pub fn immediate() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 0,
            backoff_step_ms: 0,
            rate_limit_step_ms: 0,
            redirect_delay_ms: 0,
        }
    }

    pub fn attempt_delay(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            Duration::from_millis(self.initial_delay_ms)
        } else {
            Duration::from_millis(self.backoff_step_ms.saturating_mul(attempt as u64))
        }
    }

    pub fn rate_limit_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.rate_limit_step_ms.saturating_mul(attempt as u64))
    }

    pub fn transport_error_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.backoff_step_ms.saturating_mul(attempt as u64))
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    /// Never fewer than one attempt, whatever the config says.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}
