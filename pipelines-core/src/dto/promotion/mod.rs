//! Promotion DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body of `POST /pipeline-promotions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePromotion {
    pub pipeline: IdOnly,
    pub source: AppSelector,
    pub targets: Vec<AppSelector>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdOnly {
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSelector {
    pub app: IdOnly,
}

impl AppSelector {
    pub fn new(app_id: Uuid) -> Self {
        Self {
            app: IdOnly { id: app_id },
        }
    }
}

impl CreatePromotion {
    pub fn new(pipeline_id: Uuid, source_app_id: Uuid, target_app_ids: &[Uuid]) -> Self {
        Self {
            pipeline: IdOnly { id: pipeline_id },
            source: AppSelector::new(source_app_id),
            targets: target_app_ids.iter().copied().map(AppSelector::new).collect(),
        }
    }
}
