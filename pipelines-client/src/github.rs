//! GitHub API endpoints
//!
//! The GitHub token is not known up front: it comes from the integration API,
//! so every call takes it explicitly.

use async_trait::async_trait;
use pipelines_core::domain::github::{Comparison, Repository};
use reqwest::header::{AUTHORIZATION, LOCATION};
use reqwest::{Client, RequestBuilder, redirect};
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::{ClientError, Result};
use crate::{handle_response, normalize_base_url};

/// Operations against the source-control host
#[async_trait]
pub trait SourceControlApi: Send + Sync {
    /// `GET /repos/{repo}`
    async fn get_repo(&self, token: &str, repo: &str) -> Result<Repository>;

    /// `GET /repos/{repo}/tarball/{ref}`: the redirect target of the archive
    async fn get_archive_url(&self, token: &str, repo: &str, git_ref: &str) -> Result<String>;

    /// `GET /repos/{repo}/compare/{base}...{head}`
    async fn compare(&self, token: &str, repo: &str, base: &str, head: &str) -> Result<Comparison>;
}

/// HTTP client for the GitHub API
#[derive(Debug, Clone)]
pub struct GitHubClient {
    base_url: String,
    /// Redirects are not followed so archive URLs can be read from `Location`
    client: Client,
}

impl GitHubClient {
    /// Create a new GitHub client
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self::with_client(&config.github_url, client))
    }

    /// Create a new GitHub client with a custom HTTP client
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            client,
        }
    }

    /// Get the base URL of the GitHub API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, token: &str, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "github request");
        self.client
            .get(url)
            .header(AUTHORIZATION, format!("Token {}", token))
    }
}

#[async_trait]
impl SourceControlApi for GitHubClient {
    async fn get_repo(&self, token: &str, repo: &str) -> Result<Repository> {
        let response = self.get(token, &format!("/repos/{}", repo)).send().await?;

        handle_response(response).await
    }

    async fn get_archive_url(&self, token: &str, repo: &str, git_ref: &str) -> Result<String> {
        let path = format!("/repos/{}/tarball/{}", repo, git_ref);
        let response = self.get(token, &path).send().await?;
        let status = response.status();

        if !status.is_redirection() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| ClientError::ParseError("archive redirect has no Location header".into()))
    }

    async fn compare(&self, token: &str, repo: &str, base: &str, head: &str) -> Result<Comparison> {
        let path = format!("/repos/{}/compare/{}...{}", repo, base, head);
        let response = self.get(token, &path).send().await?;

        handle_response(response).await
    }
}
