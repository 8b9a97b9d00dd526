//! Info command

use std::collections::BTreeMap;

use anyhow::Result;
use pipelines_core::StageModel;
use pipelines_core::domain::app::PipelineApp;
use pipelines_service::describe_owner;
use serde_json::json;

use super::{header, styled_hash};
use crate::api::Api;
use crate::prompt::resolve_pipeline;

/// Show the apps of a pipeline grouped by stage
pub async fn info(api: &Api, reference: &str, json: bool, with_owners: bool) -> Result<()> {
    let pipeline = resolve_pipeline(api.platform.as_ref(), reference).await?;
    let apps = api.couplings().list_pipeline_apps(pipeline.id).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "pipeline": pipeline, "apps": apps }))?
        );
        return Ok(());
    }

    header(&pipeline.name);
    if let Some(owner) = describe_owner(api.platform.as_ref(), &pipeline, &apps).await? {
        println!("owner: {}", owner);
    }

    styled_hash(&stage_rows(&api.stages, &apps, with_owners));
    Ok(())
}

/// One row per stage holding its app names
///
/// Known stages come first in promotion order; custom stages follow
/// alphabetically.
fn stage_rows(stages: &StageModel, apps: &[PipelineApp], with_owners: bool) -> Vec<(String, String)> {
    let mut by_stage: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for app in apps {
        let mut name = app.name().to_string();
        if with_owners {
            if let Some(email) = app.app.owner.as_ref().and_then(|o| o.email.as_deref()) {
                name = format!("{} ({})", name, email);
            }
        }
        by_stage.entry(app.stage()).or_default().push(name);
    }

    let mut rows = Vec::with_capacity(by_stage.len());
    for stage in stages.all_stage_names() {
        if let Some(names) = by_stage.remove(stage) {
            rows.push((capitalize(stage), names.join(", ")));
        }
    }
    rows.extend(
        by_stage
            .into_iter()
            .map(|(stage, names)| (capitalize(stage), names.join(", "))),
    );
    rows
}

fn capitalize(stage: &str) -> String {
    let mut chars = stage.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
