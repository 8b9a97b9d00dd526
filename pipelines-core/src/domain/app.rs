//! App domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::coupling::Coupling;

/// An app on the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct App {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<AppOwner>,
}

/// Owner of an app
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppOwner {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// An app joined with its coupling to a pipeline
///
/// Every app in a pipeline roster carries exactly one coupling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineApp {
    #[serde(flatten)]
    pub app: App,
    pub coupling: Coupling,
}

impl PipelineApp {
    pub fn id(&self) -> Uuid {
        self.app.id
    }

    pub fn name(&self) -> &str {
        &self.app.name
    }

    pub fn stage(&self) -> &str {
        &self.coupling.stage
    }
}
