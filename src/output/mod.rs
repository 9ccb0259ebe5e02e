//! Output module for persisting the valuation table
//!
//! This module handles:
//! - The sink trait the walker hands its accumulated records to
//! - The CSV table writer with atomic full-rewrite semantics

mod csv_output;
mod traits;

pub use csv_output::{CsvReport, COLUMNS};
pub use traits::{EnrichedRecord, ReportError, ReportResult, ReportSink};
