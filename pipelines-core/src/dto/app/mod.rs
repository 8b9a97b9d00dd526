//! App DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ResourceRef;

/// Batched app lookup: `POST /filters/apps` with `{ "in": { "id": [...] } }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppFilter {
    #[serde(rename = "in")]
    pub within: IdSet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdSet {
    pub id: Vec<Uuid>,
}

impl AppFilter {
    pub fn by_ids(ids: Vec<Uuid>) -> Self {
        Self {
            within: IdSet { id: ids },
        }
    }
}

/// Request to build a new app from a source tarball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppSetup {
    pub source_blob: SourceBlob,
    pub app: NewApp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceBlob {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewApp {
    pub name: String,
}

/// Response of an app setup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSetup {
    pub id: Uuid,
    pub app: ResourceRef,
}
