//! Pipeline domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named chain of stages through which one codebase's deployments flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<PipelineOwner>,
}

/// Owner of a pipeline
///
/// Identity only. The display name is resolved lazily: teams through the
/// team endpoint, users through the owner email of one of the pipeline's apps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOwner {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub owner_type: OwnerType,
}

/// Kind of pipeline owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerType {
    User,
    Team,
}

/// A team, as returned by the team lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
}

/// An account feature flag (e.g. `ci`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountFeature {
    pub name: String,
    pub enabled: bool,
}
