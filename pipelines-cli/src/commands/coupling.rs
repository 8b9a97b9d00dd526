//! Coupling command handlers
//!
//! Adding apps to pipelines, moving them between stages and removing them.

use anyhow::{Context, Result};
use colored::*;
use pipelines_core::StageModel;
use pipelines_service::setup;

use super::action;
use crate::api::Api;
use crate::prompt;

/// Add an app to an existing pipeline
pub async fn add(api: &Api, reference: &str, app: &str, stage: Option<String>) -> Result<()> {
    let pipeline = prompt::resolve_pipeline(api.platform.as_ref(), reference).await?;
    let stage = stage_or_prompt(&api.stages, app, stage)?;

    action(
        format!("Adding {} to {} pipeline as {}", app.bold(), pipeline.name.bold(), stage),
        api.couplings().create_coupling(pipeline.id, app, &stage),
    )
    .await?;

    Ok(())
}

pub async fn update(api: &Api, app: &str, stage: &str) -> Result<()> {
    action(
        format!("Changing {} to {}", app.bold(), stage),
        api.couplings().update_coupling(app, stage),
    )
    .await?;

    Ok(())
}

pub async fn remove(api: &Api, app: &str) -> Result<()> {
    let coupling = action(
        format!("Removing {}", app.bold()),
        api.couplings().remove_coupling(app),
    )
    .await?;

    if let Some(pipeline) = coupling.pipeline.name {
        println!("{} is no longer part of {}", app, pipeline);
    }
    Ok(())
}

/// Create a pipeline with `app` as its first member
pub async fn create(api: &Api, name: &str, app: &str, stage: Option<String>) -> Result<()> {
    setup::validate_pipeline_name(name)?;
    let name = setup::normalize_pipeline_name(name);
    let stage = stage_or_prompt(&api.stages, app, stage)?;
    let client = api.setup();

    let pipeline = action(
        format!("Creating {} pipeline", name.bold()),
        client.create_pipeline(&name),
    )
    .await?;

    action(
        format!("Adding {} to {} pipeline as {}", app.bold(), name.bold(), stage),
        api.couplings().create_coupling(pipeline.id, app, &stage),
    )
    .await?;

    Ok(())
}

/// The given stage, or a prompt defaulting to the stage inferred from the
/// app name
fn stage_or_prompt(stages: &StageModel, app: &str, stage: Option<String>) -> Result<String> {
    if let Some(stage) = stage {
        return Ok(stage);
    }

    if !prompt::is_interactive() {
        return stages
            .infer(app)
            .map(str::to_string)
            .with_context(|| format!("Cannot guess the stage of {}, pass --stage", app));
    }

    prompt::stage(&stages.all_stage_names(), stages.infer(app))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_stage_skips_inference() {
        let stages = StageModel::default();

        let stage = stage_or_prompt(&stages, "example-staging", Some("qa".to_string())).unwrap();

        assert_eq!(stage, "qa");
    }
}
