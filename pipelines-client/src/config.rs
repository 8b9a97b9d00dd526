//! Client configuration
//!
//! Base URLs, credentials and media types shared by the API clients.

/// Default platform API base URL
pub const DEFAULT_PLATFORM_URL: &str = "https://api.heroku.com";
/// Default integration API base URL
pub const DEFAULT_INTEGRATION_URL: &str = "https://kolkrabbi.heroku.com";
/// Default GitHub API base URL
pub const DEFAULT_GITHUB_URL: &str = "https://api.github.com";

/// Platform API v3 media type
pub const V3_HEADER: &str = "application/vnd.heroku+json; version=3";
/// Platform API v3 media type for pipeline resources
pub const PIPELINES_HEADER: &str = "application/vnd.heroku+json; version=3.pipelines";
/// Platform API v3 media type for filter endpoints
pub const FILTERS_HEADER: &str = "application/vnd.heroku+json; version=3.filters";

/// Settings shared by all API clients
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Platform API base URL
    pub platform_url: String,
    /// Integration (kolkrabbi) API base URL
    pub integration_url: String,
    /// GitHub API base URL
    pub github_url: String,
    /// Platform API token, also accepted by the integration API
    pub token: String,
    /// User agent sent with every request
    pub user_agent: String,
}

impl ApiConfig {
    /// Configuration pointing at the public endpoints
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            platform_url: DEFAULT_PLATFORM_URL.to_string(),
            integration_url: DEFAULT_INTEGRATION_URL.to_string(),
            github_url: DEFAULT_GITHUB_URL.to_string(),
            token: token.into(),
            user_agent: format!("pipelines-cli/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
