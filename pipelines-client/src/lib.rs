//! Pipelines HTTP Clients
//!
//! Type-safe HTTP clients for the three remote APIs the pipelines CLI talks to:
//!
//! - [`PlatformClient`]: apps, releases, slugs, pipelines, couplings and promotions
//! - [`IntegrationClient`]: GitHub account linkage, repository links and app-link settings
//! - [`GitHubClient`]: repository metadata, tarball archives and commit comparison
//!
//! Each client implements a trait ([`PlatformApi`], [`IntegrationApi`],
//! [`SourceControlApi`]) so the workflows built on top of them can be driven by
//! in-memory fakes in tests.
//!
//! # Example
//!
//! ```no_run
//! use pipelines_client::{ApiConfig, PlatformApi, PlatformClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pipelines_client::ClientError> {
//!     let config = ApiConfig::new("my-api-token");
//!     let platform = PlatformClient::new(&config)?;
//!
//!     let coupling = platform.get_coupling("example-staging").await?;
//!     println!("example-staging is in the {} stage", coupling.stage);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
mod github;
mod integration;
mod platform;

// Re-export commonly used types
pub use config::ApiConfig;
pub use error::{ClientError, Result};
pub use github::{GitHubClient, SourceControlApi};
pub use integration::{IntegrationApi, IntegrationClient};
pub use platform::{PlatformApi, PlatformClient};

use serde::de::DeserializeOwned;

// =============================================================================
// Response Handlers
// =============================================================================

/// Handle an API response and deserialize JSON
///
/// This checks the status code and returns an appropriate error if the
/// request failed, or deserializes the response body if successful.
pub(crate) async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ClientError::api_error(
            status.as_u16(),
            error_message(&error_text),
        ));
    }

    response
        .json()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
}

/// Handle an API response whose body is not needed (e.g., DELETE operations)
pub(crate) async fn handle_empty_response(response: reqwest::Response) -> Result<()> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ClientError::api_error(
            status.as_u16(),
            error_message(&error_text),
        ));
    }

    Ok(())
}

/// Pull the `message` field out of a JSON error body, or keep the raw text
///
/// All three APIs answer errors with `{ "message": "..." }`.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

/// Strip the trailing slash of a base URL
pub(crate) fn normalize_base_url(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_string()
}
