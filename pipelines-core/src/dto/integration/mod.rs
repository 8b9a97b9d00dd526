//! Integration API (kolkrabbi) DTOs

use serde::{Deserialize, Serialize};

/// Request to link a pipeline to a GitHub repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePipelineRepository {
    /// GitHub repository id
    pub repository: u64,
}

/// Pipeline repository settings (currently only CI)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRepositorySettings {
    pub ci: bool,
}

/// App-link settings for automatic deploys and review apps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppLinkSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_deploy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_for_ci: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_requests: Option<PullRequestSettings>,
}

/// Review app settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestSettings {
    pub enabled: bool,
    pub auto_deploy: bool,
    pub auto_destroy: bool,
}

impl AppLinkSettings {
    pub fn review_apps(settings: PullRequestSettings) -> Self {
        Self {
            pull_requests: Some(settings),
            ..Default::default()
        }
    }
}
