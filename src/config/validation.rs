use crate::config::types::{ApiConfig, Config, OutputConfig, PullConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_pull_config(&config.pull)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates API access configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    if config.token.is_empty() {
        return Err(ConfigError::Validation(
            "token cannot be empty (set it in the config file or via DISCOGS_TOKEN)".to_string(),
        ));
    }

    if config.username.is_empty() {
        return Err(ConfigError::Validation(
            "username cannot be empty".to_string(),
        ));
    }

    if !config
        .username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(ConfigError::Validation(format!(
            "username must contain only alphanumeric characters, hyphens, underscores, and dots, got '{}'",
            config.username
        )));
    }

    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;
    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must be http(s), got '{}'",
            config.base_url
        )));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates traversal configuration
fn validate_pull_config(config: &PullConfig) -> Result<(), ConfigError> {
    // Discogs rejects per_page values above 100
    if config.page_size < 1 || config.page_size > 100 {
        return Err(ConfigError::Validation(format!(
            "page-size must be between 1 and 100, got {}",
            config.page_size
        )));
    }

    if !config.pacing_delay.is_finite() || config.pacing_delay < 0.0 {
        return Err(ConfigError::Validation(format!(
            "pacing-delay must be a non-negative number of seconds, got {}",
            config.pacing_delay
        )));
    }

    if config.autosave_interval < 1 {
        return Err(ConfigError::Validation(format!(
            "autosave-interval must be >= 1, got {}",
            config.autosave_interval
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.table_path.is_empty() {
        return Err(ConfigError::Validation(
            "table-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
