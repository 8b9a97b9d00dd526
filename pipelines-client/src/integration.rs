//! Integration API (kolkrabbi) endpoints
//!
//! GitHub account linkage, pipeline repository links and app-link settings.

use async_trait::async_trait;
use pipelines_core::domain::github::{AppLink, GitHubAccount};
use pipelines_core::dto::integration::{
    AppLinkSettings, CreatePipelineRepository, PipelineRepositorySettings,
};
use reqwest::{Client, Method, RequestBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::error::Result;
use crate::{handle_empty_response, handle_response, normalize_base_url};

/// Operations against the integration API
#[async_trait]
pub trait IntegrationApi: Send + Sync {
    /// `GET /account/github/token`; 404 means the account is not linked to GitHub
    async fn get_github_account(&self) -> Result<GitHubAccount>;

    /// `GET /apps/{id}/github`; 404 means the app is not connected to a repository
    async fn get_app_link(&self, app_id: Uuid) -> Result<AppLink>;

    /// `PATCH /apps/{id}/github`
    async fn update_app_link(&self, app_id: Uuid, settings: AppLinkSettings) -> Result<()>;

    /// `POST /pipelines/{id}/repository`
    async fn create_pipeline_repository(
        &self,
        pipeline_id: Uuid,
        req: CreatePipelineRepository,
    ) -> Result<()>;

    /// `PATCH /pipelines/{id}/repository`
    async fn update_pipeline_repository(
        &self,
        pipeline_id: Uuid,
        settings: PipelineRepositorySettings,
    ) -> Result<()>;
}

/// HTTP client for the integration API
#[derive(Debug, Clone)]
pub struct IntegrationClient {
    base_url: String,
    token: String,
    client: Client,
}

impl IntegrationClient {
    /// Create a new integration client
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder().user_agent(&config.user_agent).build()?;
        Ok(Self::with_client(&config.integration_url, &config.token, client))
    }

    /// Create a new integration client with a custom HTTP client
    pub fn with_client(base_url: impl Into<String>, token: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            token: token.into(),
            client,
        }
    }

    /// Get the base URL of the integration API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "integration request");
        self.client.request(method, url).bearer_auth(&self.token)
    }
}

#[async_trait]
impl IntegrationApi for IntegrationClient {
    async fn get_github_account(&self) -> Result<GitHubAccount> {
        let response = self.request(Method::GET, "/account/github/token").send().await?;

        handle_response(response).await
    }

    async fn get_app_link(&self, app_id: Uuid) -> Result<AppLink> {
        let path = format!("/apps/{}/github", app_id);
        let response = self.request(Method::GET, &path).send().await?;

        handle_response(response).await
    }

    async fn update_app_link(&self, app_id: Uuid, settings: AppLinkSettings) -> Result<()> {
        let path = format!("/apps/{}/github", app_id);
        let response = self
            .request(Method::PATCH, &path)
            .json(&settings)
            .send()
            .await?;

        handle_empty_response(response).await
    }

    async fn create_pipeline_repository(
        &self,
        pipeline_id: Uuid,
        req: CreatePipelineRepository,
    ) -> Result<()> {
        let path = format!("/pipelines/{}/repository", pipeline_id);
        let response = self.request(Method::POST, &path).json(&req).send().await?;

        handle_empty_response(response).await
    }

    async fn update_pipeline_repository(
        &self,
        pipeline_id: Uuid,
        settings: PipelineRepositorySettings,
    ) -> Result<()> {
        let path = format!("/pipelines/{}/repository", pipeline_id);
        let response = self
            .request(Method::PATCH, &path)
            .json(&settings)
            .send()
            .await?;

        handle_empty_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = IntegrationClient::new(&ApiConfig::new("token")).unwrap();
        assert_eq!(client.base_url(), "https://kolkrabbi.heroku.com");
    }
}
