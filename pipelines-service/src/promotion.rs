//! Promotion orchestration
//!
//! Moves the latest release of a source app to its downstream apps: either
//! every app at the next stage of the promotion order, or an explicit list
//! of apps from the same pipeline. The promotion is submitted once and then
//! polled until no target is pending.

use std::collections::HashMap;
use std::sync::Arc;

use pipelines_client::PlatformApi;
use pipelines_core::StageModel;
use pipelines_core::domain::ResourceRef;
use pipelines_core::domain::app::PipelineApp;
use pipelines_core::domain::promotion::{self, Promotion, PromotionTarget, TargetStatus};
use pipelines_core::dto::promotion::CreatePromotion;
use tracing::{debug, info};
use uuid::Uuid;

use crate::couplings::CouplingClient;
use crate::error::{PipelineError, Result};
use crate::poll::{CancelToken, Poller};

/// Everything needed to submit a promotion
#[derive(Debug, Clone)]
pub struct PromotionPlan {
    pub pipeline: ResourceRef,
    pub source: PipelineApp,
    /// Next stage when targets were derived from the promotion order
    pub target_stage: Option<String>,
    /// Targets in roster order, or in the order they were named
    pub targets: Vec<PipelineApp>,
}

/// Final state of one promotion target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    pub app_id: Uuid,
    pub app_name: String,
    pub status: TargetStatus,
    pub error_message: Option<String>,
}

/// Per-target outcome of a completed promotion
#[derive(Debug, Clone)]
pub struct PromotionReport {
    pub promotion_id: Uuid,
    pub outcomes: Vec<TargetOutcome>,
}

/// Aggregate result of a promotion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromotionResult {
    /// Every target succeeded
    Succeeded,
    /// At least one target failed; only the failed targets are listed
    PartialFailure { failed: Vec<TargetOutcome> },
}

impl PromotionReport {
    pub fn result(&self) -> PromotionResult {
        if self
            .outcomes
            .iter()
            .all(|o| o.status == TargetStatus::Succeeded)
        {
            PromotionResult::Succeeded
        } else {
            PromotionResult::PartialFailure {
                failed: self
                    .outcomes
                    .iter()
                    .filter(|o| o.status == TargetStatus::Failed)
                    .cloned()
                    .collect(),
            }
        }
    }
}

/// Computes promotion targets, submits promotions and waits for them
pub struct PromotionOrchestrator {
    platform: Arc<dyn PlatformApi>,
    couplings: CouplingClient,
    stages: StageModel,
    poller: Poller,
}

impl PromotionOrchestrator {
    pub fn new(platform: Arc<dyn PlatformApi>, stages: StageModel, poller: Poller) -> Self {
        Self {
            couplings: CouplingClient::new(platform.clone()),
            platform,
            stages,
            poller,
        }
    }

    /// Resolve the source app's pipeline and compute the promotion targets
    ///
    /// With `explicit_targets` the next-stage rule is bypassed; every name
    /// must belong to an app of the pipeline other than the source.
    pub async fn plan(&self, app: &str, explicit_targets: &[String]) -> Result<PromotionPlan> {
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

        let (target_stage, targets) = if explicit_targets.is_empty() {
            let stage = downstream_stage(&self.stages, "promote", source.name(), &coupling.stage)?;
            let targets = apps_at_stage(&roster, stage);
            if targets.is_empty() {
                return Err(PipelineError::NoDownstreamApps {
                    action: "promote",
                    app: source.name().to_string(),
                    stage: stage.to_string(),
                });
            }
            (Some(stage.to_string()), targets)
        } else {
            (None, resolve_targets(&roster, source.name(), explicit_targets)?)
        };

        debug!(
            "Promotion plan for {}: {} target(s)",
            source.name(),
            targets.len()
        );

        Ok(PromotionPlan {
            pipeline: coupling.pipeline,
            source,
            target_stage,
            targets,
        })
    }

    /// Submit a promotion for a plan
    pub async fn submit(&self, plan: &PromotionPlan) -> Result<Promotion> {
        let target_ids: Vec<Uuid> = plan.targets.iter().map(PipelineApp::id).collect();
        let promotion = self
            .platform
            .create_promotion(CreatePromotion::new(
                plan.pipeline.id,
                plan.source.id(),
                &target_ids,
            ))
            .await?;

        info!(
            "Started promotion {} from {}",
            promotion.id,
            plan.source.name()
        );

        Ok(promotion)
    }

    /// Poll a submitted promotion until every target left `pending`
    ///
    /// API errors while polling abort the wait.
    pub async fn wait(
        &self,
        plan: &PromotionPlan,
        promotion_id: Uuid,
        cancel: &mut CancelToken,
    ) -> Result<PromotionReport> {
        let platform = self.platform.clone();
        let targets = self
            .poller
            .poll_until(cancel, |attempt| {
                let platform = platform.clone();
                async move {
                    let targets = platform.list_promotion_targets(promotion_id).await?;
                    let done = promotion::all_complete(&targets);
                    debug!(
                        "Promotion {} attempt {}: complete={}",
                        promotion_id, attempt, done
                    );
                    Ok::<_, PipelineError>(done.then_some(targets))
                }
            })
            .await?;

        Ok(PromotionReport {
            promotion_id,
            outcomes: order_outcomes(&plan.targets, targets),
        })
    }

    /// Plan, submit and wait in one go
    pub async fn promote(
        &self,
        app: &str,
        explicit_targets: &[String],
        cancel: &mut CancelToken,
    ) -> Result<PromotionReport> {
        let plan = self.plan(app, explicit_targets).await?;
        let promotion = self.submit(&plan).await?;
        self.wait(&plan, promotion.id, cancel).await
    }
}

/// The stage downstream of `stage`
///
/// # Errors
/// `InvalidSourceStage` for stages outside the promotion order and for its
/// last stage.
pub(crate) fn downstream_stage(
    stages: &StageModel,
    action: &'static str,
    app: &str,
    stage: &str,
) -> Result<&'static str> {
    stages
        .next(stage)
        .ok_or_else(|| PipelineError::InvalidSourceStage {
            action,
            app: app.to_string(),
            stage: stage.to_string(),
        })
}

/// Apps of the roster at `stage`, roster order preserved
pub(crate) fn apps_at_stage(roster: &[PipelineApp], stage: &str) -> Vec<PipelineApp> {
    roster
        .iter()
        .filter(|a| a.stage() == stage)
        .cloned()
        .collect()
}

fn resolve_targets(
    roster: &[PipelineApp],
    source_name: &str,
    names: &[String],
) -> Result<Vec<PipelineApp>> {
    let mut targets: Vec<PipelineApp> = Vec::with_capacity(names.len());

    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        if name == source_name {
            return Err(PipelineError::SelfPromotion {
                app: name.to_string(),
            });
        }
        if targets.iter().any(|t| t.name() == name) {
            continue;
        }
        let app = roster
            .iter()
            .find(|a| a.name() == name)
            .ok_or_else(|| PipelineError::UnknownTarget {
                name: name.to_string(),
            })?;
        targets.push(app.clone());
    }

    if targets.is_empty() {
        return Err(PipelineError::NoTargets);
    }

    Ok(targets)
}

/// Key poll results by app id and lay them out in plan order
///
/// Targets the plan does not know about are appended, named by id.
fn order_outcomes(planned: &[PipelineApp], targets: Vec<PromotionTarget>) -> Vec<TargetOutcome> {
    let mut by_app: HashMap<Uuid, PromotionTarget> =
        targets.into_iter().map(|t| (t.app.id, t)).collect();

    let mut outcomes: Vec<TargetOutcome> = planned
        .iter()
        .filter_map(|app| {
            by_app.remove(&app.id()).map(|t| TargetOutcome {
                app_id: app.id(),
                app_name: app.name().to_string(),
                status: t.status,
                error_message: t.error_message,
            })
        })
        .collect();

    let mut extra: Vec<TargetOutcome> = by_app
        .into_values()
        .map(|t| TargetOutcome {
            app_id: t.app.id,
            app_name: t.app.name.unwrap_or_else(|| t.app.id.to_string()),
            status: t.status,
            error_message: t.error_message,
        })
        .collect();
    extra.sort_by(|a, b| a.app_name.cmp(&b.app_name));
    outcomes.extend(extra);

    outcomes
}
