//! Interactive prompts

use std::fmt;
use std::io::IsTerminal;

use anyhow::Result;
use inquire::validator::Validation;
use inquire::{Confirm, Select, Text};
use pipelines_client::PlatformApi;
use pipelines_core::domain::pipeline::Pipeline;
use pipelines_service::{PipelineMatch, find_pipeline, setup};

/// Whether prompts can be shown
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal()
}

/// Resolve a pipeline name or id
///
/// Several pipelines with the same name are offered as a choice on a
/// terminal; elsewhere they are an error listing the candidates.
pub async fn resolve_pipeline(platform: &dyn PlatformApi, reference: &str) -> Result<Pipeline> {
    match find_pipeline(platform, reference).await? {
        PipelineMatch::Found(pipeline) => Ok(pipeline),
        PipelineMatch::Ambiguous { candidates, .. } if is_interactive() => {
            choose_pipeline(candidates)
        }
        ambiguous => Ok(ambiguous.into_unique()?),
    }
}

struct PipelineChoice(Pipeline);

impl fmt::Display for PipelineChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0.name, self.0.id)
    }
}

fn choose_pipeline(candidates: Vec<Pipeline>) -> Result<Pipeline> {
    let choices = candidates.into_iter().map(PipelineChoice).collect();
    let choice = Select::new("Which pipeline?", choices).prompt()?;
    Ok(choice.0)
}

/// Ask for a stage, starting on `default` when it is one of `stages`
pub fn stage(stages: &[&'static str], default: Option<&str>) -> Result<String> {
    let cursor = default
        .and_then(|d| stages.iter().position(|s| *s == d))
        .unwrap_or(0);

    let stage = Select::new("Stage of the app", stages.to_vec())
        .with_starting_cursor(cursor)
        .prompt()?;
    Ok(stage.to_string())
}

pub fn pipeline_name() -> Result<String> {
    let name = Text::new("Pipeline name")
        .with_validator(|input: &str| {
            Ok(match setup::validate_pipeline_name(input) {
                Ok(()) => Validation::Valid,
                Err(e) => Validation::Invalid(e.to_string().into()),
            })
        })
        .prompt()?;
    Ok(name)
}

pub fn repo_name() -> Result<String> {
    let repo = Text::new("GitHub repository to connect to (e.g. rails/rails)")
        .with_validator(|input: &str| {
            Ok(match setup::validate_repo_name(input) {
                Ok(()) => Validation::Valid,
                Err(e) => Validation::Invalid(e.to_string().into()),
            })
        })
        .prompt()?;
    Ok(repo)
}

pub fn confirm(message: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new(message).with_default(default).prompt()?)
}
