//! Pipeline bootstrap and GitHub linkage
//!
//! The steps behind `setup`, `connect`, `review-apps` and `ci`. Each step is
//! its own call so the command layer can report progress between them.

use std::sync::Arc;

use pipelines_client::{IntegrationApi, PlatformApi, SourceControlApi};
use pipelines_core::domain::ResourceRef;
use pipelines_core::domain::app::App;
use pipelines_core::domain::github::Repository;
use pipelines_core::domain::pipeline::Pipeline;
use pipelines_core::dto::app::{CreateAppSetup, NewApp, SourceBlob};
use pipelines_core::dto::integration::{
    AppLinkSettings, CreatePipelineRepository, PipelineRepositorySettings, PullRequestSettings,
};
use pipelines_core::dto::pipeline::CreatePipeline;
use tracing::{debug, info};
use uuid::Uuid;

use crate::couplings::CouplingClient;
use crate::error::{PipelineError, Result};

/// GitHub token of the authenticated account
///
/// # Errors
/// `GitHubAccountNotConnected` when the integration API answers not-found.
pub async fn github_token(integration: &dyn IntegrationApi) -> Result<String> {
    match integration.get_github_account().await {
        Ok(account) => Ok(account.github.token),
        Err(e) if e.is_not_found() => Err(PipelineError::GitHubAccountNotConnected),
        Err(e) => Err(e.into()),
    }
}

/// Lowercase a pipeline name and replace whitespace with `-`
pub fn normalize_pipeline_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect::<String>()
        .to_lowercase()
}

pub fn validate_pipeline_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(PipelineError::InvalidInput(
            "Please specify a valid pipeline name".to_string(),
        ));
    }
    Ok(())
}

/// A repository must be given as `owner/name`
pub fn validate_repo_name(repo: &str) -> Result<()> {
    let valid = matches!(
        repo.split('/').collect::<Vec<_>>().as_slice(),
        [owner, name] if !owner.is_empty() && !name.is_empty()
    );

    if valid {
        Ok(())
    } else {
        Err(PipelineError::InvalidInput(
            "Repository name must be in the format organization/repo".to_string(),
        ))
    }
}

/// Review app settings from the `review-apps` flags
///
/// Exactly one of `enable` and `disable` must be set, and the auto flags
/// only apply when enabling.
pub fn review_app_settings(
    enable: bool,
    disable: bool,
    auto_deploy: bool,
    auto_destroy: bool,
) -> Result<PullRequestSettings> {
    if enable == disable {
        return Err(PipelineError::InvalidInput(
            "You must chose to either enable or disable review apps".to_string(),
        ));
    }
    if disable && auto_deploy {
        return Err(PipelineError::InvalidInput(
            "You cannot set autodeploy when disabling review apps.".to_string(),
        ));
    }
    if disable && auto_destroy {
        return Err(PipelineError::InvalidInput(
            "You cannot set autodestroy when disabling review apps.".to_string(),
        ));
    }

    Ok(PullRequestSettings {
        enabled: enable,
        auto_deploy,
        auto_destroy,
    })
}

/// Creates pipelines and wires them to GitHub
pub struct SetupClient {
    platform: Arc<dyn PlatformApi>,
    integration: Arc<dyn IntegrationApi>,
    github: Arc<dyn SourceControlApi>,
    couplings: CouplingClient,
}

impl SetupClient {
    pub fn new(
        platform: Arc<dyn PlatformApi>,
        integration: Arc<dyn IntegrationApi>,
        github: Arc<dyn SourceControlApi>,
    ) -> Self {
        Self {
            couplings: CouplingClient::new(platform.clone()),
            platform,
            integration,
            github,
        }
    }

    pub async fn github_token(&self) -> Result<String> {
        github_token(self.integration.as_ref()).await
    }

    /// # Errors
    /// `RepositoryNotAccessible` for any failure of the lookup.
    pub async fn get_repo(&self, token: &str, repo: &str) -> Result<Repository> {
        self.github.get_repo(token, repo).await.map_err(|e| {
            debug!("Repository lookup for {} failed: {}", repo, e);
            PipelineError::RepositoryNotAccessible {
                repo: repo.to_string(),
            }
        })
    }

    pub async fn create_pipeline(&self, name: &str) -> Result<Pipeline> {
        let pipeline = self
            .platform
            .create_pipeline(CreatePipeline {
                name: name.to_string(),
            })
            .await?;

        info!("Created pipeline {} ({})", pipeline.name, pipeline.id);
        Ok(pipeline)
    }

    pub async fn link_repository(&self, pipeline_id: Uuid, repo: &Repository) -> Result<()> {
        self.integration
            .create_pipeline_repository(
                pipeline_id,
                CreatePipelineRepository {
                    repository: repo.id,
                },
            )
            .await?;
        Ok(())
    }

    /// URL of the tarball of `repo` at its default branch
    pub async fn archive_url(&self, token: &str, repo: &Repository) -> Result<String> {
        Ok(self
            .github
            .get_archive_url(token, &repo.name, &repo.default_branch)
            .await?)
    }

    /// Build an app from a source archive and couple it to the pipeline
    pub async fn create_app(
        &self,
        archive_url: &str,
        name: &str,
        pipeline_id: Uuid,
        stage: &str,
    ) -> Result<ResourceRef> {
        let setup = self
            .platform
            .create_app_setup(CreateAppSetup {
                source_blob: SourceBlob {
                    url: archive_url.to_string(),
                },
                app: NewApp {
                    name: name.to_string(),
                },
            })
            .await?;

        self.couplings
            .create_coupling(pipeline_id, &setup.app.id.to_string(), stage)
            .await?;

        Ok(setup.app)
    }

    pub async fn get_app(&self, app: &str) -> Result<App> {
        Ok(self.platform.get_app(app).await?)
    }

    pub async fn configure_app_link(&self, app_id: Uuid, settings: AppLinkSettings) -> Result<()> {
        self.integration.update_app_link(app_id, settings).await?;
        Ok(())
    }

    /// Turn CI on or off for a pipeline's repository
    pub async fn set_ci(&self, pipeline_id: Uuid, enabled: bool) -> Result<()> {
        self.integration
            .update_pipeline_repository(pipeline_id, PipelineRepositorySettings { ci: enabled })
            .await?;
        Ok(())
    }

    /// Whether the account has the `ci` feature; lookup failures count as no
    pub async fn has_ci_flag(&self) -> bool {
        match self.platform.get_account_feature("ci").await {
            Ok(feature) => feature.enabled,
            Err(e) => {
                debug!("ci feature lookup failed: {}", e);
                false
            }
        }
    }
}
