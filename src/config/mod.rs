//! Configuration module for Discollect
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use discollect::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Output table: {}", config.output.table_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ApiConfig, Config, OutputConfig, PullConfig};

// Re-export parser functions
pub use parser::{load_config, TOKEN_ENV_VAR};
