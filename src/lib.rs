//! Discollect: a polite Discogs collection valuator
//!
//! This crate pulls a user's record collection from the Discogs API page by
//! page, looks up the lowest live marketplace price for each release, and
//! writes the joined rows to a CSV table, autosaving as it goes so an
//! interrupted run keeps most of its progress.

pub mod client;
pub mod config;
pub mod output;
pub mod price;
pub mod pull;

use thiserror::Error;

/// Main error type for Discollect operations
#[derive(Debug, Error)]
pub enum DiscollectError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Report error: {0}")]
    Report(#[from] output::ReportError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Discollect operations
pub type Result<T> = std::result::Result<T, DiscollectError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use client::{ApiClient, RetryPolicy};
pub use config::Config;
pub use output::{CsvReport, EnrichedRecord, ReportSink};
pub use price::{extract_lowest_price, extract_num_for_sale};
pub use pull::{pull, PullOutcome, Walker};
