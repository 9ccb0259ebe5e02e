//! HTTP access to the Discogs API
//!
//! This module contains the outbound side of the pull:
//! - Client construction with user agent and timeouts
//! - Token authorization on every request
//! - Retry with exponential backoff and `Retry-After` handling

mod http;
mod retry;

pub use http::{build_http_client, ApiClient};
pub use retry::{parse_retry_after, RetryPolicy};
