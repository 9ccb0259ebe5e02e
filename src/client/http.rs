//! HTTP client for the Discogs API
//!
//! This module handles all outbound requests for the pull, including:
//! - Building HTTP clients with proper user agent strings
//! - Attaching the token authorization header
//! - Retry logic with exponential backoff for transient failures
//! - Rate-limit handling that honors `Retry-After`
//! - Response classification (retryable vs terminal)

use crate::client::retry::{parse_retry_after, RetryPolicy};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The User-Agent header value to send
/// * `timeout` - Bounded wait per request attempt
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.to_string())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Discogs API client with per-call retry
///
/// Holds a reqwest client, the prebuilt authorization header, and the retry
/// policy. Pacing between calls is deliberately NOT applied here; the walker
/// owns the politeness delay so retry timing and pacing stay independent.
pub struct ApiClient {
    http: Client,
    auth: HeaderValue,
    policy: RetryPolicy,
}

impl ApiClient {
    /// Creates an API client for the given token
    ///
    /// # Arguments
    ///
    /// * `token` - Discogs personal access token
    /// * `user_agent` - User-Agent header value
    /// * `policy` - Retry policy for every call made through this client
    ///
    /// # Returns
    ///
    /// * `Ok(ApiClient)` - Ready-to-use client
    /// * `Err(DiscollectError)` - Token not representable as a header value,
    ///   or the underlying client failed to build
    pub fn new(token: &str, user_agent: &str, policy: RetryPolicy) -> crate::Result<Self> {
        let http = build_http_client(user_agent, policy.request_timeout)?;
        let auth = HeaderValue::from_str(&format!("Discogs token={}", token)).map_err(|_| {
            crate::ConfigError::Validation(
                "token contains characters not allowed in a header value".to_string(),
            )
        })?;
        Ok(ApiClient { http, auth, policy })
    }

    /// Fetches a URL and parses the body as JSON, retrying transient failures
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Transport error (timeout, connect) | Retry with backoff |
    /// | HTTP 429 | Retry; wait `Retry-After` if present, else backoff |
    /// | HTTP 5xx | Retry with backoff |
    /// | Any other non-200 | Terminal, `None` |
    /// | 200 with unparseable body | Terminal, `None` |
    ///
    /// Backoff starts at the policy's `initial_backoff` and doubles after
    /// every retried attempt; a `Retry-After` wait replaces the sleep for
    /// that attempt but the base still doubles. At most `max_attempts`
    /// requests go out per call, after which the call degrades to `None`.
    ///
    /// Failure is a value, not a panic: callers treat `None` as "skip this
    /// unit of work" and keep the run alive.
    pub async fn get_json(&self, url: &str) -> Option<Value> {
        let mut backoff = self.policy.initial_backoff;

        for attempt in 1..=self.policy.max_attempts {
            let response = match self
                .http
                .get(url)
                .header(AUTHORIZATION, self.auth.clone())
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    if attempt == self.policy.max_attempts {
                        tracing::warn!(
                            "giving up on {} after {} attempts: {}",
                            url,
                            attempt,
                            classify_transport_error(&e)
                        );
                        return None;
                    }
                    tracing::debug!(
                        "attempt {}/{} for {} failed ({}), backing off {:?}",
                        attempt,
                        self.policy.max_attempts,
                        url,
                        classify_transport_error(&e),
                        backoff
                    );
                    sleep(backoff).await;
                    backoff *= 2;
                    continue;
                }
            };

            let status = response.status();

            if status == StatusCode::OK {
                return match response.json::<Value>().await {
                    Ok(value) => Some(value),
                    Err(e) => {
                        tracing::warn!("unparseable response body from {}: {}", url, e);
                        None
                    }
                };
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                if attempt == self.policy.max_attempts {
                    tracing::warn!("giving up on {} after {} attempts: rate limited", url, attempt);
                    return None;
                }
                // Server-specified wait overrides the backoff for this
                // attempt only; the base keeps doubling regardless
                let wait = parse_retry_after(response.headers()).unwrap_or(backoff);
                tracing::debug!(
                    "rate limited on {} (attempt {}/{}), waiting {:?}",
                    url,
                    attempt,
                    self.policy.max_attempts,
                    wait
                );
                sleep(wait).await;
                backoff *= 2;
                continue;
            }

            if status.is_server_error() {
                if attempt == self.policy.max_attempts {
                    tracing::warn!(
                        "giving up on {} after {} attempts: HTTP {}",
                        url,
                        attempt,
                        status
                    );
                    return None;
                }
                tracing::debug!(
                    "server error HTTP {} on {} (attempt {}/{}), backing off {:?}",
                    status,
                    url,
                    attempt,
                    self.policy.max_attempts,
                    backoff
                );
                sleep(backoff).await;
                backoff *= 2;
                continue;
            }

            // 401, 404, and friends: retrying will not help
            tracing::warn!("terminal HTTP {} from {}", status, url);
            return None;
        }

        None
    }
}

/// Maps a reqwest error to a short diagnostic label
fn classify_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timeout".to_string()
    } else if e.is_connect() {
        "connection error".to_string()
    } else {
        e.to_string()
    }
}
