use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Environment variable consulted when the config file carries no token
pub const TOKEN_ENV_VAR: &str = "DISCOGS_TOKEN";

/// Loads and parses a configuration file from the given path
///
/// The API token may come from the file or, when the file leaves it empty,
/// from the `DISCOGS_TOKEN` environment variable. Validation runs before the
/// config is returned, so a `Config` in hand is always usable.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use discollect::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Pulling collection of: {}", config.api.username);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let mut config: Config = toml::from_str(&content)?;

    // Token fallback from the environment
    if config.api.token.is_empty() {
        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            config.api.token = token;
        }
    }

    validate(&config)?;

    Ok(config)
}
