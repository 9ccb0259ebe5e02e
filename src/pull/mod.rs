//! Collection traversal and enrichment
//!
//! This module contains the core pull logic, including:
//! - Wire types for collection pages and pagination
//! - The walker that pages through the collection, prices each release,
//!   and autosaves progress through the report sink

mod page;
mod walker;

pub use page::{BasicInformation, CollectionItem, CollectionPage, Pagination, ReleaseEntry};
pub use walker::{PullOutcome, Walker};

use crate::config::Config;
use crate::output::ReportSink;

/// Runs a complete collection pull
///
/// This is the main entry point. It will:
/// 1. Build the authorized HTTP client
/// 2. Page through the user's collection folder
/// 3. Price each release against the marketplace stats endpoint
/// 4. Persist the table incrementally and once more at the end
///
/// # Arguments
///
/// * `config` - The pull configuration
/// * `sink` - Destination for the valuation table
///
/// # Returns
///
/// * `Ok(PullOutcome)` - Traversal summary (also set when stopped early)
/// * `Err(DiscollectError)` - Setup or final persistence failure
pub async fn pull(config: &Config, sink: &dyn ReportSink) -> crate::Result<PullOutcome> {
    Walker::new(config)?.run(sink).await
}
