//! Report sink trait and record types
//!
//! This module defines the trait interface for persistence sinks and the
//! row type the walker accumulates.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while writing the report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// One priced release, ready to be written as a table row
///
/// Only built once a lowest price resolved; releases without marketplace
/// data never become records. Field order is the column order of the output
/// table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    /// Discogs release identifier
    pub release_id: u64,

    /// Comma-joined artist names; may be empty
    pub artist: String,

    /// Release title
    pub title: String,

    /// Lowest listed price, already rounded to 2 decimal places
    pub lowest_price: Decimal,

    /// Listings currently for sale, when the stats payload carried it
    pub num_for_sale: Option<u64>,
}

/// Trait for persistence sinks
///
/// A sink fully rewrites its destination from the records handed to it, so
/// it is safe to call repeatedly with a growing set: every call produces a
/// complete, ordered table and never appends to prior output. The walker
/// borrows the records read-only for the duration of the call.
pub trait ReportSink {
    /// Rewrites the destination from the full record set
    ///
    /// # Arguments
    ///
    /// * `records` - All records accumulated so far, in insertion order
    fn persist(&self, records: &[EnrichedRecord]) -> ReportResult<()>;
}
