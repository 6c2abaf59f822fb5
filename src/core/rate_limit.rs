//! Per-operation fixed-window rate limiting.
//!
//! Windows are keyed by tool name only. Every tenant calling the same tool
//! draws from the same budget.

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Quota for one operation: `max_requests` per `window_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitRule {
    pub max_requests: u32,
    pub window_ms: u64,
}

impl RateLimitRule {
    pub const fn new(max_requests: u32, window_ms: u64) -> Self {
        Self {
            max_requests,
            window_ms,
        }
    }

    /// Both fields must be strictly positive.
    pub fn is_valid(&self) -> bool {
        self.max_requests > 0 && self.window_ms > 0
    }
}

/// Default rule plus per-operation overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitConfig {
    pub default_rule: RateLimitRule,

    #[serde(default)]
    pub tool_limits: HashMap<String, RateLimitRule>,
}

const MINUTE_MS: u64 = 60_000;

impl Default for RateLimitConfig {
    fn default() -> Self {
        let tool_limits = [
            // Destructive operations
            ("create_document", 20),
            ("delete_document", 10),
            ("create_contact", 20),
            ("delete_contact", 10),
            ("update_contact", 30),
            ("update_document", 30),
            // Reads
            ("list_contacts", 200),
            ("list_documents", 200),
            ("get_contact", 200),
            ("get_document", 200),
        ]
        .into_iter()
        .map(|(name, max)| (name.to_string(), RateLimitRule::new(max, MINUTE_MS)))
        .collect();

        Self {
            default_rule: RateLimitRule::new(100, MINUTE_MS),
            tool_limits,
        }
    }
}

impl RateLimitConfig {
    /// Rule applied to `operation`.
    pub fn rule_for(&self, operation: &str) -> RateLimitRule {
        self.tool_limits
            .get(operation)
            .copied()
            .unwrap_or(self.default_rule)
    }

    /// Names of rules that are not strictly positive.
    pub fn invalid_rules(&self) -> Vec<String> {
        let mut invalid: Vec<String> = self
            .tool_limits
            .iter()
            .filter(|(_, rule)| !rule.is_valid())
            .map(|(name, _)| name.clone())
            .collect();
        if !self.default_rule.is_valid() {
            invalid.push("default".to_string());
        }
        invalid.sort();
        invalid
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitDecision {
    pub allowed: bool,

    /// Whole seconds until the window resets, rounded up. Only set on rejection.
    #[serde(rename = "retryAfter", skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,

    /// When the current window ends.
    #[serde(rename = "resetTime", with = "chrono::serde::ts_milliseconds")]
    pub reset_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    start: DateTime<Utc>,
    count: u32,
}

fn window_length(window_ms: u64) -> TimeDelta {
    i64::try_from(window_ms)
        .ok()
        .and_then(TimeDelta::try_milliseconds)
        .unwrap_or(TimeDelta::MAX)
}

fn window_end(start: DateTime<Utc>, length: TimeDelta) -> Option<DateTime<Utc>> {
    start.checked_add_signed(length)
}

/// Fixed-window limiter with one counter per operation name.
///
/// Check-and-increment runs under the map's per-key lock, so concurrent
/// calls for the same operation never over-admit.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: DashMap<String, Window>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: DashMap::new(),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Check and record one invocation of `operation` at the current time.
    pub fn check_limit(&self, operation: &str) -> RateLimitDecision {
        self.check_limit_at(operation, Utc::now())
    }

    /// Check and record one invocation of `operation` at `now`.
    pub fn check_limit_at(&self, operation: &str, now: DateTime<Utc>) -> RateLimitDecision {
        let rule = self.config.rule_for(operation);
        let window_len = window_length(rule.window_ms);

        let mut window = self
            .windows
            .entry(operation.to_string())
            .or_insert(Window {
                start: now,
                count: 0,
            });

        // A window too long to represent never resets.
        if window_end(window.start, window_len).is_some_and(|end| now >= end) {
            *window = Window {
                start: now,
                count: 0,
            };
        }

        let reset_at = window_end(window.start, window_len).unwrap_or(DateTime::<Utc>::MAX_UTC);

        if window.count < rule.max_requests {
            window.count += 1;
            debug!(
                operation,
                count = window.count,
                max = rule.max_requests,
                "Rate limit admitted"
            );
            return RateLimitDecision {
                allowed: true,
                retry_after_secs: None,
                reset_at,
            };
        }

        let remaining_ms = (reset_at - now).num_milliseconds().max(0) as u64;
        let retry_after = remaining_ms.div_ceil(1000);
        warn!(
            operation,
            retry_after, "Rate limit exceeded ({} per {} ms)", rule.max_requests, rule.window_ms
        );
        RateLimitDecision {
            allowed: false,
            retry_after_secs: Some(retry_after),
            reset_at,
        }
    }

    /// Invocations recorded in the current window of `operation`.
    pub fn current_count(&self, operation: &str) -> u32 {
        self.windows.get(operation).map(|w| w.count).unwrap_or(0)
    }
}
