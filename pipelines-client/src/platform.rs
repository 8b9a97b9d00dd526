//! Platform API endpoints
//!
//! Apps, releases, slugs, pipelines, pipeline couplings and pipeline
//! promotions.

use async_trait::async_trait;
use pipelines_core::domain::app::App;
use pipelines_core::domain::coupling::Coupling;
use pipelines_core::domain::pipeline::{AccountFeature, Pipeline, Team};
use pipelines_core::domain::promotion::{Promotion, PromotionTarget};
use pipelines_core::domain::release::{Release, Slug};
use pipelines_core::dto::app::{AppFilter, AppSetup, CreateAppSetup};
use pipelines_core::dto::coupling::{CreateCoupling, UpdateCoupling};
use pipelines_core::dto::pipeline::CreatePipeline;
use pipelines_core::dto::promotion::CreatePromotion;
use reqwest::header::{ACCEPT, RANGE};
use reqwest::{Client, RequestBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::config::{ApiConfig, FILTERS_HEADER, PIPELINES_HEADER, V3_HEADER};
use crate::error::Result;
use crate::{handle_empty_response, handle_response, normalize_base_url};

/// Operations against the platform API
///
/// `app` parameters accept either an app name or an app id.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    // Couplings

    /// `GET /apps/{app}/pipeline-couplings`
    async fn get_coupling(&self, app: &str) -> Result<Coupling>;

    /// `GET /pipelines/{id}/pipeline-couplings`
    async fn list_pipeline_couplings(&self, pipeline_id: Uuid) -> Result<Vec<Coupling>>;

    /// `POST /pipeline-couplings`
    async fn create_coupling(&self, req: CreateCoupling) -> Result<Coupling>;

    /// `PATCH /pipeline-couplings/{id}`
    async fn update_coupling(&self, coupling_id: Uuid, req: UpdateCoupling) -> Result<Coupling>;

    /// `DELETE /pipeline-couplings/{id}`
    async fn delete_coupling(&self, coupling_id: Uuid) -> Result<()>;

    // Apps

    /// `GET /apps/{app}`
    async fn get_app(&self, app: &str) -> Result<App>;

    /// `POST /filters/apps`: fetch many apps by id in one request
    async fn filter_apps(&self, filter: AppFilter) -> Result<Vec<App>>;

    /// `POST /app-setups`
    async fn create_app_setup(&self, req: CreateAppSetup) -> Result<AppSetup>;

    // Releases

    /// `GET /apps/{app}/releases`, newest first
    async fn list_releases(&self, app: &str) -> Result<Vec<Release>>;

    /// `GET /apps/{app}/slugs/{id}`
    async fn get_slug(&self, app: &str, slug_id: Uuid) -> Result<Slug>;

    // Pipelines

    /// `GET /pipelines?eq[name]={name}`
    ///
    /// Several pipelines can share a name across owners.
    async fn find_pipelines(&self, name: &str) -> Result<Vec<Pipeline>>;

    /// `GET /pipelines/{id}`
    async fn get_pipeline(&self, pipeline_id: Uuid) -> Result<Pipeline>;

    /// `POST /pipelines`
    async fn create_pipeline(&self, req: CreatePipeline) -> Result<Pipeline>;

    // Promotions

    /// `POST /pipeline-promotions`
    async fn create_promotion(&self, req: CreatePromotion) -> Result<Promotion>;

    /// `GET /pipeline-promotions/{id}/promotion-targets`
    async fn list_promotion_targets(&self, promotion_id: Uuid) -> Result<Vec<PromotionTarget>>;

    // Accounts

    /// `GET /teams/{id}`
    async fn get_team(&self, team_id: Uuid) -> Result<Team>;

    /// `GET /account/features/{name}`
    async fn get_account_feature(&self, name: &str) -> Result<AccountFeature>;
}

/// HTTP client for the platform API
#[derive(Debug, Clone)]
pub struct PlatformClient {
    /// Base URL of the platform API (e.g., "https://api.heroku.com")
    base_url: String,
    /// API token sent as a bearer token
    token: String,
    /// HTTP client instance
    client: Client,
}

impl PlatformClient {
    /// Create a new platform client
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder().user_agent(&config.user_agent).build()?;
        Ok(Self::with_client(&config.platform_url, &config.token, client))
    }

    /// Create a new platform client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, token: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            token: token.into(),
            client,
        }
    }

    /// Get the base URL of the platform API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str, accept: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "platform request");
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header(ACCEPT, accept)
    }
}

#[async_trait]
impl PlatformApi for PlatformClient {
    // =============================================================================
    // Couplings
    // =============================================================================

    async fn get_coupling(&self, app: &str) -> Result<Coupling> {
        let path = format!("/apps/{}/pipeline-couplings", app);
        let response = self
            .request(reqwest::Method::GET, &path, PIPELINES_HEADER)
            .send()
            .await?;

        handle_response(response).await
    }

    async fn list_pipeline_couplings(&self, pipeline_id: Uuid) -> Result<Vec<Coupling>> {
        let path = format!("/pipelines/{}/pipeline-couplings", pipeline_id);
        let response = self
            .request(reqwest::Method::GET, &path, V3_HEADER)
            .send()
            .await?;

        handle_response(response).await
    }

    async fn create_coupling(&self, req: CreateCoupling) -> Result<Coupling> {
        let response = self
            .request(reqwest::Method::POST, "/pipeline-couplings", V3_HEADER)
            .json(&req)
            .send()
            .await?;

        handle_response(response).await
    }

    async fn update_coupling(&self, coupling_id: Uuid, req: UpdateCoupling) -> Result<Coupling> {
        let path = format!("/pipeline-couplings/{}", coupling_id);
        let response = self
            .request(reqwest::Method::PATCH, &path, V3_HEADER)
            .json(&req)
            .send()
            .await?;

        handle_response(response).await
    }

    async fn delete_coupling(&self, coupling_id: Uuid) -> Result<()> {
        let path = format!("/pipeline-couplings/{}", coupling_id);
        let response = self
            .request(reqwest::Method::DELETE, &path, V3_HEADER)
            .send()
            .await?;

        handle_empty_response(response).await
    }

    // =============================================================================
    // Apps
    // =============================================================================

    async fn get_app(&self, app: &str) -> Result<App> {
        let path = format!("/apps/{}", app);
        let response = self
            .request(reqwest::Method::GET, &path, V3_HEADER)
            .send()
            .await?;

        handle_response(response).await
    }

    async fn filter_apps(&self, filter: AppFilter) -> Result<Vec<App>> {
        let response = self
            .request(reqwest::Method::POST, "/filters/apps", FILTERS_HEADER)
            .json(&filter)
            .send()
            .await?;

        handle_response(response).await
    }

    async fn create_app_setup(&self, req: CreateAppSetup) -> Result<AppSetup> {
        let response = self
            .request(reqwest::Method::POST, "/app-setups", V3_HEADER)
            .json(&req)
            .send()
            .await?;

        handle_response(response).await
    }

    // =============================================================================
    // Releases
    // =============================================================================

    async fn list_releases(&self, app: &str) -> Result<Vec<Release>> {
        let path = format!("/apps/{}/releases", app);
        let response = self
            .request(reqwest::Method::GET, &path, V3_HEADER)
            .header(RANGE, "version ..; order=desc")
            .send()
            .await?;

        handle_response(response).await
    }

    async fn get_slug(&self, app: &str, slug_id: Uuid) -> Result<Slug> {
        let path = format!("/apps/{}/slugs/{}", app, slug_id);
        let response = self
            .request(reqwest::Method::GET, &path, V3_HEADER)
            .send()
            .await?;

        handle_response(response).await
    }

    // =============================================================================
    // Pipelines
    // =============================================================================

    async fn find_pipelines(&self, name: &str) -> Result<Vec<Pipeline>> {
        let response = self
            .request(reqwest::Method::GET, "/pipelines", PIPELINES_HEADER)
            .query(&[("eq[name]", name)])
            .send()
            .await?;

        handle_response(response).await
    }

    async fn get_pipeline(&self, pipeline_id: Uuid) -> Result<Pipeline> {
        let path = format!("/pipelines/{}", pipeline_id);
        let response = self
            .request(reqwest::Method::GET, &path, PIPELINES_HEADER)
            .send()
            .await?;

        handle_response(response).await
    }

    async fn create_pipeline(&self, req: CreatePipeline) -> Result<Pipeline> {
        let response = self
            .request(reqwest::Method::POST, "/pipelines", PIPELINES_HEADER)
            .json(&req)
            .send()
            .await?;

        handle_response(response).await
    }

    // =============================================================================
    // Promotions
    // =============================================================================

    async fn create_promotion(&self, req: CreatePromotion) -> Result<Promotion> {
        let response = self
            .request(reqwest::Method::POST, "/pipeline-promotions", PIPELINES_HEADER)
            .json(&req)
            .send()
            .await?;

        handle_response(response).await
    }

    async fn list_promotion_targets(&self, promotion_id: Uuid) -> Result<Vec<PromotionTarget>> {
        let path = format!("/pipeline-promotions/{}/promotion-targets", promotion_id);
        let response = self
            .request(reqwest::Method::GET, &path, PIPELINES_HEADER)
            .send()
            .await?;

        handle_response(response).await
    }

    // =============================================================================
    // Accounts
    // =============================================================================

    async fn get_team(&self, team_id: Uuid) -> Result<Team> {
        let path = format!("/teams/{}", team_id);
        let response = self
            .request(reqwest::Method::GET, &path, V3_HEADER)
            .send()
            .await?;

        handle_response(response).await
    }

    async fn get_account_feature(&self, name: &str) -> Result<AccountFeature> {
        let path = format!("/account/features/{}", name);
        let response = self
            .request(reqwest::Method::GET, &path, V3_HEADER)
            .send()
            .await?;

        handle_response(response).await
    }
}
