use crate::mcp::contracts::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use clap::Args;
use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

/// Connection settings, taken from flags or their environment variables.
#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    /// Latentsense API key
    #[arg(long, env = "LATENTSENSE_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,
    /// Project id sent with every request
    #[arg(long, env = "LATENTSENSE_PROJECT_ID", global = true)]
    pub project_id: Option<String>,
    /// API base URL
    #[arg(long, env = "LATENTSENSE_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[arg(long, env = "LATENTSENSE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout_secs: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("LATENTSENSE_API_KEY environment variable is required")]
    MissingApiKey,

    #[error("invalid base url `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("timeout must be at least one second")]
    InvalidTimeout,
}

/// Resolved, immutable settings handed to the transport.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_key: String,
    pub project_id: Option<String>,
    pub base_url: Url,
    pub timeout: Duration,
}

impl ConfigArgs {
    pub fn resolve(&self) -> Result<GatewayConfig, ConfigError> {
        let api_key = non_blank(self.api_key.as_deref()).ok_or(ConfigError::MissingApiKey)?;
        let project_id = non_blank(self.project_id.as_deref());

        let base_url = Url::parse(self.base_url.trim()).map_err(|err| {
            ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: err.to_string(),
            }
        })?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: "expected an http(s) url".to_string(),
            });
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(GatewayConfig {
            api_key,
            project_id,
            base_url,
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
