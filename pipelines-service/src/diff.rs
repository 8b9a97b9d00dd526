//! Commit difference between an app and its downstream apps
//!
//! Compares the commit of the latest release of the source app against the
//! latest release of every app at the next stage, and lists the commits each
//! downstream app is missing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use pipelines_client::{ClientError, IntegrationApi, PlatformApi, SourceControlApi};
use pipelines_core::StageModel;
use pipelines_core::domain::app::PipelineApp;
use pipelines_core::domain::github::{Comparison, GitHubCommit};
use pipelines_core::domain::release;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::couplings::CouplingClient;
use crate::error::{PipelineError, Result};
use crate::promotion::{apps_at_stage, downstream_stage};
use crate::setup;

/// An app and the commit its latest release was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCommit {
    pub app_id: Uuid,
    pub app_name: String,
    pub hash: String,
}

/// One commit the downstream app does not have yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub short_sha: String,
    pub date: DateTime<Utc>,
    /// First line of the commit message
    pub message: String,
    pub author: String,
}

impl From<&GitHubCommit> for CommitSummary {
    fn from(commit: &GitHubCommit) -> Self {
        Self {
            short_sha: commit.short_sha().to_string(),
            date: commit.commit.author.date,
            message: commit.summary().to_string(),
            author: commit.commit.author.name.clone(),
        }
    }
}

/// Comparison result for one downstream app
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOutcome {
    UpToDate,
    Ahead {
        ahead_by: u64,
        /// Oldest commit first
        commits: Vec<CommitSummary>,
    },
    /// The comparison call failed for this app only
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDiff {
    pub app: AppCommit,
    pub outcome: DiffOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffReport {
    /// Every downstream app runs the source commit; nothing was compared
    AllUpToDate {
        source: AppCommit,
        downstream: Vec<AppCommit>,
    },
    Compared {
        source: AppCommit,
        repo: String,
        results: Vec<AppDiff>,
    },
}

/// Computes downstream commit differences
pub struct DiffEngine {
    platform: Arc<dyn PlatformApi>,
    integration: Arc<dyn IntegrationApi>,
    github: Arc<dyn SourceControlApi>,
    couplings: CouplingClient,
    stages: StageModel,
}

impl DiffEngine {
    pub fn new(
        platform: Arc<dyn PlatformApi>,
        integration: Arc<dyn IntegrationApi>,
        github: Arc<dyn SourceControlApi>,
        stages: StageModel,
    ) -> Self {
        Self {
            couplings: CouplingClient::new(platform.clone()),
            platform,
            integration,
            github,
            stages,
        }
    }

    /// Diff `app` against the apps of the next stage
    ///
    /// GitHub is only contacted when at least one downstream app runs a
    /// different commit. A failed comparison marks that app as unavailable
    /// and the remaining apps are still compared.
    pub async fn diff(&self, app: &str) -> Result<DiffReport> {
        let coupling = self.couplings.get_coupling(app).await?;
        let roster = self.couplings.list_pipeline_apps(coupling.pipeline.id).await?;

        let source = roster
            .iter()
            .find(|a| a.id() == coupling.app.id)
            .cloned()
            .ok_or_else(|| PipelineError::RosterMismatch {
                pipeline_id: coupling.pipeline.id,
                detail: format!("source app {} is missing from the roster", app),
            })?;

        let stage = downstream_stage(&self.stages, "diff", source.name(), &coupling.stage)?;
        let downstream = apps_at_stage(&roster, stage);
        if downstream.is_empty() {
            return Err(PipelineError::NoDownstreamApps {
                action: "diff",
                app: source.name().to_string(),
                stage: stage.to_string(),
            });
        }

        let (source, downstream) = tokio::try_join!(
            self.latest_commit(&source),
            try_join_all(downstream.iter().map(|a| self.latest_commit(a))),
        )?;

        if downstream.iter().all(|d| d.hash == source.hash) {
            debug!("All downstream apps of {} are up to date", source.app_name);
            return Ok(DiffReport::AllUpToDate { source, downstream });
        }

        let token = setup::github_token(self.integration.as_ref()).await?;
        let repo = self.linked_repo(&source).await?;

        let mut results = Vec::with_capacity(downstream.len());
        for app in downstream {
            let outcome = if app.hash == source.hash {
                DiffOutcome::UpToDate
            } else {
                self.compare(&token, &repo, &app, &source).await?
            };
            results.push(AppDiff { app, outcome });
        }

        Ok(DiffReport::Compared {
            source,
            repo,
            results,
        })
    }

    async fn latest_commit(&self, app: &PipelineApp) -> Result<AppCommit> {
        let no_release = || PipelineError::NoReleaseFound {
            app: app.name().to_string(),
        };

        let releases = self.platform.list_releases(app.name()).await?;
        let slug_ref = release::latest_with_slug(&releases)
            .and_then(|r| r.slug.as_ref())
            .ok_or_else(no_release)?;

        let slug = self.platform.get_slug(app.name(), slug_ref.id).await?;
        let hash = slug.commit.ok_or_else(no_release)?;

        Ok(AppCommit {
            app_id: app.id(),
            app_name: app.name().to_string(),
            hash,
        })
    }

    async fn linked_repo(&self, source: &AppCommit) -> Result<String> {
        match self.integration.get_app_link(source.app_id).await {
            Ok(link) => Ok(link.repo),
            Err(e) if e.is_not_found() => Err(PipelineError::GitHubNotConnected {
                app: source.app_name.clone(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn compare(
        &self,
        token: &str,
        repo: &str,
        downstream: &AppCommit,
        source: &AppCommit,
    ) -> Result<DiffOutcome> {
        match self
            .github
            .compare(token, repo, &downstream.hash, &source.hash)
            .await
        {
            Ok(comparison) => Ok(ahead(comparison)),
            Err(ClientError::ApiError { status, message }) => {
                warn!(
                    "Comparison for {} failed with status {}: {}",
                    downstream.app_name, status, message
                );
                Ok(DiffOutcome::Unavailable { reason: message })
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn ahead(comparison: Comparison) -> DiffOutcome {
    DiffOutcome::Ahead {
        ahead_by: comparison.ahead_by,
        commits: comparison
            .commits
            .iter()
            .rev()
            .map(CommitSummary::from)
            .collect(),
    }
}
