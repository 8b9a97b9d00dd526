//! Pipeline lookup and ownership

use pipelines_client::PlatformApi;
use pipelines_core::domain::app::PipelineApp;
use pipelines_core::domain::pipeline::{OwnerType, Pipeline};
use tracing::debug;
use uuid::Uuid;

use crate::error::{PipelineError, Result};

/// Outcome of resolving a pipeline reference
#[derive(Debug, Clone)]
pub enum PipelineMatch {
    Found(Pipeline),
    /// Several pipelines share the name; the caller picks one
    Ambiguous { name: String, candidates: Vec<Pipeline> },
}

impl PipelineMatch {
    /// Turn an ambiguous match into an error
    pub fn into_unique(self) -> Result<Pipeline> {
        match self {
            Self::Found(pipeline) => Ok(pipeline),
            Self::Ambiguous { name, candidates } => {
                Err(PipelineError::AmbiguousPipeline { name, candidates })
            }
        }
    }
}

/// Look up a pipeline by id or by name
///
/// A reference that parses as a UUID is fetched by id. Anything else is
/// looked up by name and every match is returned when there are several.
///
/// # Errors
/// `PipelineNotFound` when an id returns not-found or a name matches nothing.
pub async fn find_pipeline(platform: &dyn PlatformApi, reference: &str) -> Result<PipelineMatch> {
    if let Ok(id) = Uuid::parse_str(reference) {
        return match platform.get_pipeline(id).await {
            Ok(pipeline) => Ok(PipelineMatch::Found(pipeline)),
            Err(e) if e.is_not_found() => Err(PipelineError::PipelineNotFound(reference.to_string())),
            Err(e) => Err(e.into()),
        };
    }

    let mut pipelines = platform.find_pipelines(reference).await?;
    debug!("{} pipeline(s) named {}", pipelines.len(), reference);

    match pipelines.len() {
        0 => Err(PipelineError::PipelineNotFound(reference.to_string())),
        1 => Ok(PipelineMatch::Found(pipelines.remove(0))),
        _ => Ok(PipelineMatch::Ambiguous {
            name: reference.to_string(),
            candidates: pipelines,
        }),
    }
}

/// Display name of a pipeline's owner
///
/// Teams are resolved through the team endpoint as `"{name} (team)"`. Users
/// are resolved from the owner email of one of the pipeline's apps, and are
/// `None` when no app is owned by them.
pub async fn describe_owner(
    platform: &dyn PlatformApi,
    pipeline: &Pipeline,
    apps: &[PipelineApp],
) -> Result<Option<String>> {
    let Some(owner) = &pipeline.owner else {
        return Ok(None);
    };

    match owner.owner_type {
        OwnerType::Team => {
            let team = platform.get_team(owner.id).await?;
            Ok(Some(format!("{} (team)", team.name)))
        }
        OwnerType::User => Ok(apps
            .iter()
            .filter_map(|a| a.app.owner.as_ref())
            .find(|o| o.id == owner.id)
            .and_then(|o| o.email.clone())),
    }
}
