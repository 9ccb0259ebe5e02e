use serde::Deserialize;

/// Main configuration structure for Discollect
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub pull: PullConfig,
    pub output: OutputConfig,
}

/// Discogs API access configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Personal access token; may be left empty in the file and supplied
    /// through the `DISCOGS_TOKEN` environment variable instead
    #[serde(default)]
    pub token: String,

    /// Collection owner whose folders are pulled
    pub username: String,

    /// API root; overridable so tests can point at a local server
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// User-Agent header sent on every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Traversal behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PullConfig {
    /// Releases requested per collection page (Discogs caps this at 100)
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: u32,

    /// Seconds to wait between any two outbound requests
    #[serde(rename = "pacing-delay", default = "default_pacing_delay")]
    pub pacing_delay: f64,

    /// Rewrite the output table after every N releases seen
    #[serde(rename = "autosave-interval", default = "default_autosave_interval")]
    pub autosave_interval: u32,
}

impl Default for PullConfig {
    fn default() -> Self {
        PullConfig {
            page_size: default_page_size(),
            pacing_delay: default_pacing_delay(),
            autosave_interval: default_autosave_interval(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the CSV valuation table
    #[serde(rename = "table-path")]
    pub table_path: String,
}

fn default_base_url() -> String {
    "https://api.discogs.com".to_string()
}

fn default_user_agent() -> String {
    "Discollect/1.0".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_pacing_delay() -> f64 {
    1.1
}

fn default_autosave_interval() -> u32 {
    10
}
