//! API wiring
//!
//! Builds the three HTTP clients from the CLI configuration and hands them
//! out as trait objects to the workflows.

use std::sync::Arc;

use anyhow::{Context, Result};
use pipelines_client::{
    GitHubClient, IntegrationApi, IntegrationClient, PlatformApi, PlatformClient, SourceControlApi,
};
use pipelines_core::StageModel;
use pipelines_service::{CouplingClient, DiffEngine, Poller, PromotionOrchestrator, SetupClient};

use crate::config::Config;

/// Handles to the remote APIs used by one command
pub struct Api {
    pub platform: Arc<dyn PlatformApi>,
    pub integration: Arc<dyn IntegrationApi>,
    pub github: Arc<dyn SourceControlApi>,
    pub stages: StageModel,
    poller: Poller,
}

impl Api {
    /// Create the API clients
    pub fn new(config: &Config) -> Result<Self> {
        let api_config = config.api_config();

        let platform =
            PlatformClient::new(&api_config).context("Failed to create platform API client")?;
        let integration = IntegrationClient::new(&api_config)
            .context("Failed to create integration API client")?;
        let github =
            GitHubClient::new(&api_config).context("Failed to create GitHub API client")?;

        Ok(Self {
            platform: Arc::new(platform),
            integration: Arc::new(integration),
            github: Arc::new(github),
            stages: StageModel::default(),
            poller: Poller::new(config.poll_config()),
        })
    }

    pub fn couplings(&self) -> CouplingClient {
        CouplingClient::new(self.platform.clone())
    }

    pub fn promotions(&self) -> PromotionOrchestrator {
        PromotionOrchestrator::new(
            self.platform.clone(),
            self.stages.clone(),
            self.poller.clone(),
        )
    }

    pub fn diffs(&self) -> DiffEngine {
        DiffEngine::new(
            self.platform.clone(),
            self.integration.clone(),
            self.github.clone(),
            self.stages.clone(),
        )
    }

    pub fn setup(&self) -> SetupClient {
        SetupClient::new(
            self.platform.clone(),
            self.integration.clone(),
            self.github.clone(),
        )
    }
}
