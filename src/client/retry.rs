//! Retry policy and rate-limit header handling
//!
//! Backoff state lives inside a single `get_json` call; this module only
//! holds the knobs and the `Retry-After` parser so both have focused tests.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::time::Duration;

/// Knobs for the retry loop around a single request
///
/// The defaults match the pull's production behavior: up to 5 attempts,
/// exponential backoff starting at 1 second, 30 second per-attempt timeout.
/// Tests inject a policy with millisecond backoff to keep runtime sane.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum attempts per call, including the first
    pub max_attempts: u32,

    /// Wait before the first retried attempt; doubles after every retry
    pub initial_backoff: Duration,

    /// Bounded wait per attempt, applied as the request timeout
    pub request_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 5,
            initial_backoff: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Extracts a delta-seconds `Retry-After` value from response headers
///
/// Discogs sends plain (possibly fractional) seconds. The HTTP-date form is
/// not parsed; callers fall back to their computed backoff when this
/// returns `None`.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?;
    let seconds: f64 = raw.trim().parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some(Duration::from_secs_f64(seconds))
}
