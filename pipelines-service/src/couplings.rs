//! Coupling access
//!
//! CRUD over the pipeline coupling resource, plus the roster join that
//! attaches each app of a pipeline to its coupling.

use std::collections::HashMap;
use std::sync::Arc;

use pipelines_client::PlatformApi;
use pipelines_core::domain::app::{App, PipelineApp};
use pipelines_core::domain::coupling::Coupling;
use pipelines_core::dto::app::AppFilter;
use pipelines_core::dto::coupling::{CreateCoupling, UpdateCoupling};
use tracing::debug;
use uuid::Uuid;

use crate::error::{PipelineError, Result};

/// Accessor for pipeline couplings
#[derive(Clone)]
pub struct CouplingClient {
    platform: Arc<dyn PlatformApi>,
}

impl CouplingClient {
    pub fn new(platform: Arc<dyn PlatformApi>) -> Self {
        Self { platform }
    }

    /// Fetch the coupling of an app
    ///
    /// # Errors
    /// `AppNotInPipeline` when the platform answers not-found.
    pub async fn get_coupling(&self, app: &str) -> Result<Coupling> {
        self.platform.get_coupling(app).await.map_err(|e| {
            if e.is_not_found() {
                PipelineError::AppNotInPipeline {
                    app: app.to_string(),
                }
            } else {
                e.into()
            }
        })
    }

    /// Fetch every app of a pipeline joined with its coupling
    ///
    /// Apps are fetched in one batched filter request. The result keeps the
    /// order of the pipeline's coupling list.
    ///
    /// # Errors
    /// `RosterMismatch` when a coupling has no app or an app has no coupling.
    pub async fn list_pipeline_apps(&self, pipeline_id: Uuid) -> Result<Vec<PipelineApp>> {
        let couplings = self.platform.list_pipeline_couplings(pipeline_id).await?;

        if couplings.is_empty() {
            return Ok(Vec::new());
        }

        let ids = couplings.iter().map(|c| c.app.id).collect();
        let apps = self.platform.filter_apps(AppFilter::by_ids(ids)).await?;

        debug!(
            "Joining {} app(s) with {} coupling(s) of pipeline {}",
            apps.len(),
            couplings.len(),
            pipeline_id
        );

        let mut by_id: HashMap<Uuid, App> = apps.into_iter().map(|a| (a.id, a)).collect();

        let mut roster = Vec::with_capacity(couplings.len());
        for coupling in couplings {
            let app = by_id
                .remove(&coupling.app.id)
                .ok_or_else(|| PipelineError::RosterMismatch {
                    pipeline_id,
                    detail: format!("coupled app {} was not returned", coupling.app.id),
                })?;
            roster.push(PipelineApp { app, coupling });
        }

        if let Some(app) = by_id.values().next() {
            return Err(PipelineError::RosterMismatch {
                pipeline_id,
                detail: format!("app {} ({}) has no coupling", app.name, app.id),
            });
        }

        Ok(roster)
    }

    /// Couple an app to a pipeline at a stage
    pub async fn create_coupling(&self, pipeline_id: Uuid, app: &str, stage: &str) -> Result<Coupling> {
        let coupling = self
            .platform
            .create_coupling(CreateCoupling {
                app: app.to_string(),
                pipeline: pipeline_id,
                stage: stage.to_string(),
            })
            .await?;

        debug!("Coupled {} to pipeline {} at {}", app, pipeline_id, stage);

        Ok(coupling)
    }

    /// Move an app to another stage
    ///
    /// The caller only knows the app, so the coupling is fetched first and
    /// patched by id.
    pub async fn update_coupling(&self, app: &str, stage: &str) -> Result<Coupling> {
        let coupling = self.get_coupling(app).await?;
        let updated = self
            .platform
            .update_coupling(
                coupling.id,
                UpdateCoupling {
                    stage: stage.to_string(),
                },
            )
            .await?;

        Ok(updated)
    }

    /// Remove an app from its pipeline
    ///
    /// Returns the coupling that was deleted.
    pub async fn remove_coupling(&self, app: &str) -> Result<Coupling> {
        let coupling = self.get_coupling(app).await?;
        self.platform.delete_coupling(coupling.id).await?;

        Ok(coupling)
    }
}
