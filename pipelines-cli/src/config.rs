//! CLI configuration
//!
//! Endpoints, credentials and polling limits. Every value can come from a
//! flag or from its environment variable.

use std::time::Duration;

use pipelines_client::ApiConfig;
use pipelines_client::config::{DEFAULT_GITHUB_URL, DEFAULT_INTEGRATION_URL, DEFAULT_PLATFORM_URL};
use pipelines_service::PollConfig;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Platform API token (HEROKU_API_KEY)
    pub api_key: String,

    /// Platform API base URL
    pub api_url: String,

    /// Integration API base URL
    pub integration_url: String,

    /// GitHub API base URL
    pub github_url: String,

    /// Wait between two promotion status polls
    pub poll_interval: Duration,

    /// Give up waiting for a promotion after this long
    pub poll_timeout: Option<Duration>,
}

impl Config {
    /// Creates a new configuration with default endpoints
    #[cfg(test)]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_PLATFORM_URL.to_string(),
            integration_url: DEFAULT_INTEGRATION_URL.to_string(),
            github_url: DEFAULT_GITHUB_URL.to_string(),
            poll_interval: Duration::from_secs(1),
            poll_timeout: None,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_key.trim().is_empty() {
            anyhow::bail!("No API key found. Set HEROKU_API_KEY or pass --api-key");
        }

        for (name, url) in [
            ("api_url", &self.api_url),
            ("integration_url", &self.integration_url),
            ("github_url", &self.github_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.poll_timeout.is_some_and(|t| t.is_zero()) {
            anyhow::bail!("poll_timeout must be greater than 0");
        }

        Ok(())
    }

    /// Settings shared by the API clients
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            platform_url: self.api_url.clone(),
            integration_url: self.integration_url.clone(),
            github_url: self.github_url.clone(),
            ..ApiConfig::new(&self.api_key)
        }
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: self.poll_interval,
            max_attempts: None,
            timeout: self.poll_timeout,
        }
    }
}
