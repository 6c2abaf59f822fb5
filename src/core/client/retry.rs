//! Retry policy shared by every request executor.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bounded retry with a fixed backoff schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    /// Total attempts per call, including the first one. Never below 1.
    pub max_attempts: u32,

    /// Delay before retry N (0-based). Retries past the end reuse the last entry.
    pub backoff_schedule_ms: Vec<u64>,

    /// Statuses that are treated as transient.
    pub retryable_status_codes: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            backoff_schedule_ms: vec![1000, 2000, 4000],
            // too many requests, bad gateway, service unavailable, gateway timeout
            retryable_status_codes: vec![429, 502, 503, 504],
        }
    }
}

impl RetryPolicy {
    /// Attempts to perform, clamped to at least one.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Whether a response status should be retried.
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_status_codes.contains(&status)
    }

    /// Delay to wait after the failed attempt with 0-based index `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let ms = self
            .backoff_schedule_ms
            .get(attempt as usize)
            .or_else(|| self.backoff_schedule_ms.last())
            .copied()
            .unwrap_or(0);
        Duration::from_millis(ms)
    }
}
